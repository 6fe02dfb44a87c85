use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::geocode::Geocoder;
use crate::models::Place;
use crate::store::{Store, StoreError};
use crate::upload::{ImageStore, UploadedImage};
use crate::validation;
use crate::AppState;

pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub creator: Uuid,
}

pub struct UpdatePlace {
    pub title: String,
    pub description: String,
}

/// Orchestrates validation, geocoding, the paired writes, and image cleanup
/// for the place use cases.
pub struct PlaceService {
    store: Arc<dyn Store>,
    geocoder: Arc<dyn Geocoder>,
    images: ImageStore,
}

impl PlaceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            geocoder: state.geocoder.clone(),
            images: state.images.clone(),
        }
    }

    pub async fn get_place_by_id(&self, id: Uuid) -> Result<Place, ApiError> {
        self.store
            .find_place(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Could not find a place for the provided id."))
    }

    pub async fn get_places_by_user(&self, user_id: Uuid) -> Result<Vec<Place>, ApiError> {
        let places = self.store.find_places_by_creator(user_id).await?;
        if places.is_empty() {
            return Err(ApiError::not_found(
                "Could not find places for the provided user id.",
            ));
        }
        Ok(places)
    }

    /// Validate, geocode the address, confirm the creator exists, then insert
    /// the place and the owner's reference in one atomic paired write.
    pub async fn create_place(
        &self,
        input: NewPlace,
        image: Option<UploadedImage>,
    ) -> Result<Place, ApiError> {
        validation::validate_create_place(&input.title, &input.description, &input.address)?;

        let location = self.geocoder.resolve(&input.address).await?;

        let creator = self
            .store
            .find_user(input.creator)
            .await?
            .ok_or_else(|| ApiError::not_found("Could not find user for provided id."))?;

        let stored_image = match &image {
            Some(image) => Some(self.images.save(image).await?),
            None => None,
        };

        let place = Place::new(
            input.title,
            input.description,
            input.address,
            location,
            creator.id,
            stored_image.clone(),
        );

        if let Err(err) = self.store.insert_place_for_user(&place).await {
            // The place never made it in; don't strand its image on disk.
            if let Some(stored) = stored_image {
                self.images.remove(&stored).await;
            }
            return Err(match err {
                StoreError::NotFound(_) => {
                    ApiError::not_found("Could not find user for provided id.")
                }
                other => ApiError::from(other),
            });
        }

        Ok(place)
    }

    /// Apply title/description changes only. Address, location, and creator
    /// are immutable after creation; no re-geocode happens here.
    pub async fn update_place(&self, id: Uuid, input: UpdatePlace) -> Result<Place, ApiError> {
        validation::validate_update_place(&input.title, &input.description)?;

        let mut place = self.get_place_by_id(id).await?;
        place.title = input.title;
        place.description = input.description;
        place.updated_at = Utc::now();

        self.store.update_place(&place).await?;
        Ok(place)
    }

    /// Delete the place and the owner's reference atomically, then release
    /// the stored image. Image cleanup failure never fails the request.
    pub async fn delete_place(&self, id: Uuid) -> Result<(), ApiError> {
        let place = match self.store.delete_place_for_user(id).await {
            Ok(place) => place,
            Err(StoreError::NotFound(_)) => {
                return Err(ApiError::not_found(
                    "Could not find a place for the provided id.",
                ))
            }
            Err(other) => return Err(other.into()),
        };

        if let Some(image) = place.image {
            self.images.remove(&image).await;
        }
        Ok(())
    }
}
