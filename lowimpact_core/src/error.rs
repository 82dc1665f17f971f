//! Error types for the lowimpact_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lowimpact_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// A stored value could not be parsed as an integer
    #[error("Malformed value {value:?} for key {key:?}")]
    Parse { key: String, value: String },

    /// Playback operation issued in the wrong state
    #[error("Playback error: {0}")]
    Playback(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
