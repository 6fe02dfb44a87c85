use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Place, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from the data access layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// CRUD over the Users and Places collections.
///
/// The two paired-write operations are atomic in every implementation: a
/// concurrent reader never observes a place without the owner's reference,
/// or the reverse. Failure in either half rolls back both.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, StoreError>;
    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError>;

    /// Persist title/description changes to an existing place.
    async fn update_place(&self, place: &Place) -> Result<(), StoreError>;

    /// Paired write: insert the place and append its id to the owner's place
    /// set. Fails with `NotFound` if the creator does not exist.
    async fn insert_place_for_user(&self, place: &Place) -> Result<(), StoreError>;

    /// Paired write: delete the place and remove its id from the owner's
    /// place set, returning the deleted place.
    async fn delete_place_for_user(&self, id: Uuid) -> Result<Place, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
