use std::collections::HashSet;
use std::path::Path;

use crate::business::Business;
use crate::ConfigError;

/// Load and validate a catalog from a JSON array of businesses.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Vec<Business>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog JSON already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the JSON is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<Vec<Business>, ConfigError> {
    let businesses: Vec<Business> =
        serde_json::from_str(content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&businesses)?;

    Ok(businesses)
}

// Bad coordinates are tolerated here: the filter engine drops such records
// from distance searches instead.
fn validate_catalog(businesses: &[Business]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for business in businesses {
        if business.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "business '{}' has an empty id",
                business.name
            )));
        }

        if business.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "business '{}' name must be non-empty",
                business.id
            )));
        }

        if business.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "business '{}' category must be non-empty",
                business.id
            )));
        }

        if !seen_ids.insert(business.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate business id: '{}'",
                business.id
            )));
        }
    }

    Ok(())
}
