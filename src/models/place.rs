use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coordinate pair derived from geocoding a place's address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    /// Derived from the address at creation time, never user-supplied and
    /// never updated afterwards.
    pub location: Location,
    pub creator: Uuid,
    /// Stored image path relative to the serving root, if one was uploaded.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn new(
        title: String,
        description: String,
        address: String,
        location: Location,
        creator: Uuid,
        image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            address,
            location,
            creator,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}
