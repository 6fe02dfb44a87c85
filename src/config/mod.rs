use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub geocode: GeocodeConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string. Required by the server binary, not by the test
    /// suites, which run against the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_secs: i64,
    /// Whether the mutating place routes require a bearer token. Off by
    /// default; enforcement is a deployment decision, not a hardcoded one.
    pub protect_place_routes: bool,
}

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub endpoint: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub image_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // The signing secret has no sane default. Its absence is a startup
        // failure, never a per-request one.
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingVar("JWT_SECRET"))?;

        Ok(Self {
            environment,
            server: ServerConfig {
                port: parse_var("PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok(),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_secs: parse_var("JWT_EXPIRY_SECS", 3600)?,
                protect_place_routes: parse_var("PLACES_REQUIRE_AUTH", false)?,
            },
            geocode: GeocodeConfig {
                endpoint: env::var("GEOCODE_ENDPOINT")
                    .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
                user_agent: env::var("GEOCODE_USER_AGENT")
                    .unwrap_or_else(|_| format!("places-api/{}", env!("CARGO_PKG_VERSION"))),
            },
            upload: UploadConfig {
                image_dir: env::var("UPLOAD_IMAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("uploads/images")),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}

// Global config - loaded once at startup, read-only afterwards
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Load configuration from the environment. Called once at startup so that
/// missing configuration aborts before the server takes traffic.
pub fn init() -> Result<&'static AppConfig, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = AppConfig::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Access the loaded configuration.
///
/// Panics if `init()` has not run; every entry point (the binary and the
/// test harnesses) initializes configuration first.
pub fn config() -> &'static AppConfig {
    CONFIG.get().expect("config::init() must be called at startup")
}
