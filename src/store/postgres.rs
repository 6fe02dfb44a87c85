use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Location, Place, User};
use crate::store::{Store, StoreError};

/// PostgreSQL-backed store. Paired writes run inside a single transaction so
/// no partial state is ever visible to concurrent readers.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, create the pool, and run pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {}", e)))?;

        info!("Connected to database, migrations applied");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        image: row.get("image"),
        places: row.get("places"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn place_from_row(row: &PgRow) -> Place {
    Place {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        address: row.get("address"),
        location: Location {
            lat: row.get("lat"),
            lng: row.get("lng"),
        },
        creator: row.get("creator"),
        image: row.get("image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, image, places, created_at, updated_at";
const PLACE_COLUMNS: &str =
    "id, title, description, address, lat, lng, creator, image, created_at, updated_at";

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, image, places, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.image)
        .bind(&user.places)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail(user.email.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM places WHERE id = $1", PLACE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(place_from_row))
    }

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM places WHERE creator = $1 ORDER BY created_at",
            PLACE_COLUMNS
        ))
        .bind(creator)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(place_from_row).collect())
    }

    async fn update_place(&self, place: &Place) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE places SET title = $1, description = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&place.title)
        .bind(&place.description)
        .bind(place.updated_at)
        .bind(place.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("place {}", place.id)));
        }
        Ok(())
    }

    async fn insert_place_for_user(&self, place: &Place) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO places (id, title, description, address, lat, lng, creator, image, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(place.id)
        .bind(&place.title)
        .bind(&place.description)
        .bind(&place.address)
        .bind(place.location.lat)
        .bind(place.location.lng)
        .bind(place.creator)
        .bind(&place.image)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            "UPDATE users SET places = array_append(places, $1), updated_at = now() WHERE id = $2",
        )
        .bind(place.id)
        .bind(place.creator)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound(format!("user {}", place.creator)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_place_for_user(&self, id: Uuid) -> Result<Place, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "DELETE FROM places WHERE id = $1 RETURNING {}",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let place = match row {
            Some(row) => place_from_row(&row),
            None => {
                tx.rollback().await?;
                return Err(StoreError::NotFound(format!("place {}", id)));
            }
        };

        sqlx::query(
            "UPDATE users SET places = array_remove(places, $1), updated_at = now() WHERE id = $2",
        )
        .bind(place.id)
        .bind(place.creator)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(place)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
