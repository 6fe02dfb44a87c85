use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::{Signup, UserService};
use crate::upload::{self, UploadedImage};
use crate::AppState;

/// GET /users - all users, password digests excluded
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = UserService::new(&state).list_users().await?;
    Ok(Json(json!({
        "message": "Fetching users success!",
        "users": users
    })))
}

/// POST /users/signup - multipart: name, email, password, image?
pub async fn signup(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut name = String::new();
    let mut email = String::new();
    let mut password = String::new();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => name = field.text().await?,
            Some("email") => email = field.text().await?,
            Some("password") => password = field.text().await?,
            Some("image") => image = Some(upload::read_image_field(field).await?),
            _ => {}
        }
    }

    let (user, token) = UserService::new(&state)
        .signup(
            Signup {
                name,
                email,
                password,
            },
            image,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully!",
            "user": user,
            "token": token
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (user, token) = UserService::new(&state)
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({
        "message": "Logged in successfully!",
        "user": user,
        "token": token
    })))
}
