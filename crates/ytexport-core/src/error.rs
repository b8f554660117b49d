//! Error types for ytexport-core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to fetch playlist {url}: {source}")]
    PlaylistFetch {
        url: String,
        #[source]
        source: ytexport_extract::ExtractError,
    },

    #[error("Failed to fetch subscriptions: {0}")]
    SubscriptionsFetch(String),

    #[error("No subscriptions found (ensure cookies are logged in)")]
    NoSubscriptions,

    #[error("No valid YouTube IDs found in {}", .0.display())]
    NoValidIds(PathBuf),

    #[error("Parent directory does not exist: {}", .0.display())]
    MissingParent(PathBuf),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Usage(_) | ExportError::NoSubscriptions => 2,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
