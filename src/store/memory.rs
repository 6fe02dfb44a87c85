use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Place, User};
use crate::store::{Store, StoreError};

/// In-memory store used by the test suites.
///
/// Paired writes mutate both maps under a single write guard, so readers see
/// either both halves of a write or neither, matching the transactional
/// guarantee of the PostgreSQL implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    fail_next_paired_write: AtomicBool,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    places: HashMap<Uuid, Place>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next paired write fail before mutating anything, to exercise
    /// the all-or-nothing contract.
    pub fn fail_next_paired_write(&self) {
        self.fail_next_paired_write.store(true, Ordering::SeqCst);
    }

    fn take_failure_flag(&self) -> bool {
        self.fail_next_paired_write.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        Ok(self.inner.read().await.places.get(&id).cloned())
    }

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError> {
        let inner = self.inner.read().await;
        let mut places: Vec<Place> = inner
            .places
            .values()
            .filter(|p| p.creator == creator)
            .cloned()
            .collect();
        places.sort_by_key(|p| p.created_at);
        Ok(places)
    }

    async fn update_place(&self, place: &Place) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.places.get_mut(&place.id) {
            Some(existing) => {
                existing.title = place.title.clone();
                existing.description = place.description.clone();
                existing.updated_at = place.updated_at;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("place {}", place.id))),
        }
    }

    async fn insert_place_for_user(&self, place: &Place) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if self.take_failure_flag() {
            return Err(StoreError::Query("simulated paired-write failure".to_string()));
        }

        let user = inner
            .users
            .get_mut(&place.creator)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", place.creator)))?;

        user.places.push(place.id);
        inner.places.insert(place.id, place.clone());
        Ok(())
    }

    async fn delete_place_for_user(&self, id: Uuid) -> Result<Place, StoreError> {
        let mut inner = self.inner.write().await;

        if self.take_failure_flag() {
            return Err(StoreError::Query("simulated paired-write failure".to_string()));
        }

        let place = inner
            .places
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("place {}", id)))?;

        if let Some(user) = inner.users.get_mut(&place.creator) {
            user.places.retain(|pid| *pid != place.id);
        }
        Ok(place)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
