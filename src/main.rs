use std::sync::Arc;

use places_api::geocode::NominatimClient;
use places_api::store::PgStore;
use places_api::upload::ImageStore;
use places_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "places_api=info,tower_http=info".into()),
        )
        .init();

    // Configuration problems (a missing JWT_SECRET above all) abort here,
    // before the server takes any traffic.
    let config = match config::init() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Fatal configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Starting places API in {:?} mode", config.environment);

    let database_url = match config.database.url.as_deref() {
        Some(url) => url,
        None => {
            tracing::error!("Fatal configuration error: DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let store = match PgStore::connect(database_url, config.database.max_connections).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        store: Arc::new(store),
        geocoder: Arc::new(NominatimClient::new(&config.geocode)),
        images: ImageStore::new(&config.upload.image_dir),
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Places API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
