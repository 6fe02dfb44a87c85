use std::sync::Arc;

use axum::middleware::from_fn;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod geocode;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod upload;
pub mod validation;

use geocode::Geocoder;
use store::Store;
use upload::ImageStore;

/// Shared per-request context: the store pool, the geocoding client, and the
/// image destination. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub geocoder: Arc<dyn Geocoder>,
    pub images: ImageStore,
}

/// Build the application router.
///
/// Requires `config::init()` to have run: whether the mutating place routes
/// sit behind the bearer-token middleware is a configuration decision.
pub fn app(state: AppState) -> Router {
    let protect = config::config().security.protect_place_routes;

    let create = post(handlers::places::create);
    let mutate = patch(handlers::places::update).delete(handlers::places::delete);
    let (create, mutate) = if protect {
        (
            create.route_layer(from_fn(middleware::auth::require_auth)),
            mutate.route_layer(from_fn(middleware::auth::require_auth)),
        )
    } else {
        (create, mutate)
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Places
        .route("/places", create)
        .route("/places/:pid", get(handlers::places::get_by_id).merge(mutate))
        .route("/places/user/:uid", get(handlers::places::get_by_user))
        // Users
        .route("/users", get(handlers::users::list))
        .route("/users/signup", post(handlers::users::signup))
        .route("/users/login", post(handlers::users::login))
        // Uploaded images
        .nest_service("/uploads/images", ServeDir::new(state.images.root()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
