use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::{NewPlace, PlaceService, UpdatePlace};
use crate::upload::{self, UploadedImage};
use crate::AppState;

/// GET /places/:pid
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let place = PlaceService::new(&state).get_place_by_id(pid).await?;
    Ok(Json(json!({
        "message": "Fetching place success!",
        "place": place
    })))
}

/// GET /places/user/:uid
pub async fn get_by_user(
    State(state): State<AppState>,
    Path(uid): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let places = PlaceService::new(&state).get_places_by_user(uid).await?;
    Ok(Json(json!({
        "message": "Fetching places for user success!",
        "places": places
    })))
}

/// POST /places - multipart: title, description, address, creator, image?
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut title = String::new();
    let mut description = String::new();
    let mut address = String::new();
    let mut creator_raw = String::new();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("title") => title = field.text().await?,
            Some("description") => description = field.text().await?,
            Some("address") => address = field.text().await?,
            Some("creator") => creator_raw = field.text().await?,
            Some("image") => image = Some(upload::read_image_field(field).await?),
            _ => {}
        }
    }

    let creator = Uuid::parse_str(creator_raw.trim()).map_err(|_| {
        let mut field_errors = HashMap::new();
        field_errors.insert("creator".to_string(), "must be a valid user id".to_string());
        ApiError::unprocessable_entity("Invalid inputs passed, please check your data.", field_errors)
    })?;

    let place = PlaceService::new(&state)
        .create_place(
            NewPlace {
                title,
                description,
                address,
                creator,
            },
            image,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Place created successfully!",
            "place": place
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

/// PATCH /places/:pid - title and description only
pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Json(payload): Json<UpdatePlaceRequest>,
) -> Result<Json<Value>, ApiError> {
    let place = PlaceService::new(&state)
        .update_place(
            pid,
            UpdatePlace {
                title: payload.title,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(json!({
        "message": "Place updated successfully!",
        "place": place
    })))
}

/// DELETE /places/:pid
pub async fn delete(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    PlaceService::new(&state).delete_place(pid).await?;
    Ok(Json(json!({
        "message": "Place deleted successfully!"
    })))
}
