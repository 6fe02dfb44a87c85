// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity (failed per-field validation)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 422 - duplicate email; the client contract treats this as a
    // validation-class failure rather than a 409
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (external service issues)
    BadGateway(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::Conflict(_) => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity { message, field_errors } => {
                json!({
                    "error": true,
                    "message": message,
                    "code": "UNPROCESSABLE_ENTITY",
                    "field_errors": field_errors
                })
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

// Convert component error types to ApiError
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(msg) => ApiError::not_found(msg),
            crate::store::StoreError::DuplicateEmail(_) => {
                ApiError::conflict("User exists already, please login instead.")
            }
            crate::store::StoreError::Query(msg) => {
                // Don't expose internal store errors to clients
                tracing::error!("Store query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::store::StoreError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::geocode::GeocodeError> for ApiError {
    fn from(err: crate::geocode::GeocodeError) -> Self {
        match err {
            crate::geocode::GeocodeError::NotFound => {
                let mut field_errors = HashMap::new();
                field_errors.insert(
                    "address".to_string(),
                    "Could not find location for the specified address".to_string(),
                );
                ApiError::unprocessable_entity(
                    "Could not find location for the specified address.",
                    field_errors,
                )
            }
            crate::geocode::GeocodeError::Unavailable(msg) => {
                tracing::error!("Geocoding provider error: {}", msg);
                ApiError::bad_gateway("Geocoding service is currently unavailable")
            }
        }
    }
}

impl From<crate::auth::CredentialError> for ApiError {
    fn from(err: crate::auth::CredentialError) -> Self {
        // Hashing and signing failures are server faults; bad tokens are
        // mapped to 401 at the middleware, not here.
        tracing::error!("Credential error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<crate::upload::UploadError> for ApiError {
    fn from(err: crate::upload::UploadError) -> Self {
        match err {
            crate::upload::UploadError::InvalidMediaType(mime) => {
                let mut field_errors = HashMap::new();
                field_errors.insert("image".to_string(), format!("Unsupported media type: {}", mime));
                ApiError::unprocessable_entity("Invalid image media type", field_errors)
            }
            crate::upload::UploadError::TooLarge(size) => {
                let mut field_errors = HashMap::new();
                field_errors.insert(
                    "image".to_string(),
                    format!(
                        "Image is {} bytes; the limit is {}",
                        size,
                        crate::upload::MAX_IMAGE_BYTES
                    ),
                );
                ApiError::unprocessable_entity("Uploaded image is too large", field_errors)
            }
            crate::upload::UploadError::Read(msg) => ApiError::bad_request(msg),
            crate::upload::UploadError::Io(io_err) => {
                tracing::error!("Image storage error: {}", io_err);
                ApiError::internal_server_error("Failed to store uploaded image")
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::bad_request(format!("Invalid multipart payload: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
