use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Work factor for bcrypt digests.
pub const BCRYPT_COST: u32 = 12;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        let expiry_secs = config::config().security.jwt_expiry_secs;
        Self {
            sub: user_id,
            email,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Hash a plaintext password for storage. Slow by construction.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Verify a plaintext password against a stored digest.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, CredentialError> {
    Ok(bcrypt::verify(password, digest)?)
}

/// Issue a signed, time-limited bearer token for a user.
pub fn issue_token(user_id: Uuid, email: &str) -> Result<String, CredentialError> {
    let secret = &config::config().security.jwt_secret;
    let claims = Claims::new(user_id, email.to_string());
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a bearer token's signature and expiry, returning its claims.
pub fn verify_token(token: &str) -> Result<Claims, CredentialError> {
    let secret = &config::config().security.jwt_secret;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
