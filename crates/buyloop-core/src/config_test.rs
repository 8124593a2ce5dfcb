use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BUYLOOP_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert!(cfg.is_development());
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_path.to_str(), Some("./data/buyloop.json"));
    assert_eq!(cfg.catalog_path.to_str(), Some("./config/businesses.json"));
    assert_eq!(cfg.reference_point, Coordinates::new(14.7174, -90.6413));
    assert!((cfg.default_distance_km - 50.0).abs() < f64::EPSILON);
    assert!(cfg.api_keys.is_empty());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUYLOOP_BIND_ADDR"),
        "expected InvalidEnvVar(BUYLOOP_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_reference_point_override() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_REFERENCE_LAT", "40.4168");
    map.insert("BUYLOOP_REFERENCE_LNG", "-3.7038");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.reference_point, Coordinates::new(40.4168, -3.7038));
}

#[test]
fn build_app_config_reference_lat_not_a_number() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_REFERENCE_LAT", "north");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUYLOOP_REFERENCE_LAT"),
        "expected InvalidEnvVar(BUYLOOP_REFERENCE_LAT), got: {result:?}"
    );
}

#[test]
fn build_app_config_reference_point_out_of_range() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_REFERENCE_LAT", "91.0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref reason, .. }) if reason.contains("not a valid coordinate")),
        "expected out-of-range error, got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_finite_reference() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_REFERENCE_LNG", "NaN");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUYLOOP_REFERENCE_LNG"),
        "expected InvalidEnvVar(BUYLOOP_REFERENCE_LNG), got: {result:?}"
    );
}

#[test]
fn build_app_config_default_distance_override() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_DEFAULT_DISTANCE_KM", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.default_distance_km.abs() < f64::EPSILON);
}

#[test]
fn build_app_config_default_distance_negative() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_DEFAULT_DISTANCE_KM", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUYLOOP_DEFAULT_DISTANCE_KM"),
        "expected InvalidEnvVar(BUYLOOP_DEFAULT_DISTANCE_KM), got: {result:?}"
    );
}

#[test]
fn build_app_config_splits_api_keys() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_API_KEYS", " alpha, ,beta ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_keys, vec!["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn debug_output_redacts_api_keys() {
    let mut map = HashMap::new();
    map.insert("BUYLOOP_API_KEYS", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("redacted"));
}
