#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use places_api::geocode::{GeocodeError, Geocoder};
use places_api::models::Location;
use places_api::store::MemoryStore;
use places_api::upload::ImageStore;
use places_api::{app, config, AppState};

/// Address the stub geocoder refuses to resolve.
pub const UNRESOLVABLE_ADDRESS: &str = "Unknown Island, Nowhere";

/// Coordinates the stub geocoder returns for every other address.
pub const STUB_LOCATION: Location = Location {
    lat: 40.748817,
    lng: -73.985428,
};

/// Deterministic geocoder so the suites never touch the network.
pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, address: &str) -> Result<Location, GeocodeError> {
        if address == UNRESOLVABLE_ADDRESS {
            return Err(GeocodeError::NotFound);
        }
        Ok(STUB_LOCATION)
    }
}

/// Build an app over a fresh in-memory store, returning the store handle for
/// direct state assertions.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    config::init().expect("config should initialize");

    let store = Arc::new(MemoryStore::new());
    let images = ImageStore::new(std::env::temp_dir().join(format!("places-test-{}", Uuid::new_v4())));
    let state = AppState {
        store: store.clone(),
        geocoder: Arc::new(StubGeocoder),
        images,
    };
    (app(state), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(
    app: &Router,
    method: Method,
    path: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub const BOUNDARY: &str = "places-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Build a multipart body of text fields plus an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, mime, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, mime
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub async fn post_multipart(app: &Router, path: &str, body: Vec<u8>) -> (StatusCode, Value) {
    post_multipart_with_token(app, path, body, None).await
}

pub async fn post_multipart_with_token(
    app: &Router,
    path: &str,
    body: Vec<u8>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, multipart_content_type());
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::from(body)).unwrap();
    send(app, request).await
}

/// Sign up a user through the API and return the response body.
pub async fn signup_user(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let body = multipart_body(
        &[("name", name), ("email", email), ("password", password)],
        None,
    );
    let (status, body) = post_multipart(app, "/users/signup", body).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    body
}

/// Create a place through the API for the given creator id.
pub async fn create_place(
    app: &Router,
    title: &str,
    description: &str,
    address: &str,
    creator: &str,
) -> (StatusCode, Value) {
    let body = multipart_body(
        &[
            ("title", title),
            ("description", description),
            ("address", address),
            ("creator", creator),
        ],
        None,
    );
    post_multipart(app, "/places", body).await
}
