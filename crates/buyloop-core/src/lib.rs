pub mod app_config;
pub mod business;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use business::{
    validate_new_business, Business, Coordinates, Hours, Message, MessageSender, NewBusiness,
    ValidationError, Weekday,
};
pub use catalog::{load_catalog, parse_catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{available_categories, filter, filter_with_distance, FilterSpec, Ranked};
pub use geo::{format_distance, haversine_km, EARTH_RADIUS_KM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
