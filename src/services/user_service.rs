use std::sync::Arc;

use crate::auth;
use crate::error::ApiError;
use crate::models::{PublicUser, User};
use crate::store::{Store, StoreError};
use crate::upload::{ImageStore, UploadedImage};
use crate::validation;
use crate::AppState;

pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Orchestrates signup, login, and user listing.
pub struct UserService {
    store: Arc<dyn Store>,
    images: ImageStore,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            images: state.images.clone(),
        }
    }

    /// All users, password digests excluded. An empty list is a valid result,
    /// not an error; only a store failure surfaces as one.
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, ApiError> {
        let users = self.store.list_users().await.map_err(|err| {
            tracing::error!("Listing users failed: {}", err);
            ApiError::internal_server_error("Fetching users failed, please try again later.")
        })?;
        Ok(users.iter().map(PublicUser::from).collect())
    }

    pub async fn signup(
        &self,
        input: Signup,
        image: Option<UploadedImage>,
    ) -> Result<(PublicUser, String), ApiError> {
        validation::validate_signup(&input.name, &input.email, &input.password)?;
        let email = validation::normalize_email(&input.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("User exists already, please login instead."));
        }

        let password_hash = auth::hash_password(&input.password)?;

        let stored_image = match &image {
            Some(image) => Some(self.images.save(image).await?),
            None => None,
        };

        let user = User::new(input.name, email, password_hash, stored_image);

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            // Lost a race on the unique email index
            Err(StoreError::DuplicateEmail(_)) => {
                return Err(ApiError::conflict("User exists already, please login instead."))
            }
            Err(other) => return Err(other.into()),
        }

        let token = auth::issue_token(user.id, &user.email)?;
        Ok((PublicUser::from(user), token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(PublicUser, String), ApiError> {
        validation::validate_login(email, password)?;
        let email = validation::normalize_email(email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials, could not log you in."))?;

        if !auth::verify_password(password, &user.password_hash)? {
            return Err(ApiError::unauthorized("Invalid credentials, could not log you in."));
        }

        let token = auth::issue_token(user.id, &user.email)?;
        Ok((PublicUser::from(user), token))
    }
}
