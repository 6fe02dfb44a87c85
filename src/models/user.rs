use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default avatar for users who sign up without uploading an image.
pub const DEFAULT_USER_IMAGE: &str =
    "https://images.pexels.com/photos/839011/pexels-photo-839011.jpeg?auto=compress&cs=tinysrgb&dpr=2&h=750&w=1260";

/// Full user record as persisted, including the password digest.
///
/// Deliberately does not implement `Serialize`: the digest must never reach
/// a response body. Convert to [`PublicUser`] before serializing.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
    /// Exactly the set of place ids whose creator is this user. Maintained
    /// only through the store's paired writes.
    pub places: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            image: image.unwrap_or_else(|| DEFAULT_USER_IMAGE.to_string()),
            places: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Client-facing view of a user, without the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub places: Vec<Uuid>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            places: user.places.clone(),
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            places: user.places,
        }
    }
}
