use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing cached orders.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Executive order '{0}' not found in cache")]
    NotFound(String),

    #[error("Failed to parse cached order {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize order '{id}': {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CacheError>;
