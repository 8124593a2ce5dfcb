use crate::app_config::{AppConfig, Environment};
use crate::business::Coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be a finite number".to_string(),
            })
        }
    };

    let env = parse_environment(&or_default("BUYLOOP_ENV", "development"))?;
    let bind_addr = parse_addr("BUYLOOP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BUYLOOP_LOG_LEVEL", "info");
    let data_path = PathBuf::from(or_default("BUYLOOP_DATA_PATH", "./data/buyloop.json"));
    let catalog_path = PathBuf::from(or_default(
        "BUYLOOP_CATALOG_PATH",
        "./config/businesses.json",
    ));

    // San Juan Sacatepéquez town centre.
    let reference_point = Coordinates::new(
        parse_f64("BUYLOOP_REFERENCE_LAT", "14.7174")?,
        parse_f64("BUYLOOP_REFERENCE_LNG", "-90.6413")?,
    );
    if !reference_point.is_valid() {
        return Err(ConfigError::InvalidEnvVar {
            var: "BUYLOOP_REFERENCE_LAT/BUYLOOP_REFERENCE_LNG".to_string(),
            reason: format!(
                "[{}, {}] is not a valid coordinate pair",
                reference_point.lat, reference_point.lng
            ),
        });
    }

    let default_distance_km = parse_f64("BUYLOOP_DEFAULT_DISTANCE_KM", "50")?;
    if default_distance_km < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BUYLOOP_DEFAULT_DISTANCE_KM".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }

    let api_keys = or_default("BUYLOOP_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_path,
        catalog_path,
        reference_point,
        default_distance_km,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything but the three known names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BUYLOOP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
