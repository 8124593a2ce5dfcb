use std::net::SocketAddr;
use std::path::PathBuf;

use crate::business::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// JSON document backing the store.
    pub data_path: PathBuf,
    /// Seed catalog loaded when the store is empty.
    pub catalog_path: PathBuf,
    /// Origin for distance filtering when a request does not supply one.
    pub reference_point: Coordinates,
    /// Distance limit applied when a request does not supply one; 0 disables.
    pub default_distance_km: f64,
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_path", &self.data_path)
            .field("catalog_path", &self.catalog_path)
            .field("reference_point", &self.reference_point)
            .field("default_distance_km", &self.default_distance_km)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}
