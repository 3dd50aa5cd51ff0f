//! Error types for media shelf.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media shelf.
#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("TMDB API key not configured. Set TMDB_API_KEY or tmdb.api_key in config")]
    TmdbApiKeyMissing,

    // Configuration errors
    #[error("Invalid config file {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Provider errors
    #[error("TMDB request failed: {0}")]
    TmdbRequest(String),

    #[error("LLM request failed: {0}")]
    LlmRequest(String),

    // Execute errors
    #[error("Move failed {from} -> {to}: {reason}")]
    MoveFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Checksum mismatch after copying: {0}")]
    ChecksumMismatch(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
