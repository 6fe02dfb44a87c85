use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub mod places;
pub mod users;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Places API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "places": "GET /places/:pid, GET /places/user/:uid, POST /places, PATCH /places/:pid, DELETE /places/:pid",
            "users": "GET /users, POST /users/signup, POST /users/login",
            "images": "GET /uploads/images/:file",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "message": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": true,
                "message": "database unavailable",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
