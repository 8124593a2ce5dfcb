use std::path::Path;

use buyloop_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid business: {0}")]
    Validation(#[from] ValidationError),

    #[error("business not found: {0}")]
    NotFound(String),

    #[error("message text must be non-empty")]
    EmptyMessage,

    #[error("no numeric business id left to assign")]
    IdsExhausted,
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
