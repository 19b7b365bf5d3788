//! Fauna-Watch: a forum thread watcher and digest mailer
//!
//! This crate crawls a classifieds forum's thread-listing pages, extracts
//! structured thread records, filters them against a keyword list, and
//! emails an HTML digest of the matches to a configured recipient.

pub mod config;
pub mod crawler;
pub mod digest;
pub mod handler;
pub mod notify;
pub mod record;

use thiserror::Error;

/// Main error type for Fauna-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Keyword list error: {0}")]
    Keywords(#[from] KeywordError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Keyword-list loading errors
///
/// A missing file, malformed JSON, or an empty list all fail the
/// triggered run with a distinct status rather than silently matching
/// everything or nothing.
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Failed to read keyword file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse keyword file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Keyword file {0} contains no keywords")]
    Empty(String),
}

/// Notifier errors: credential lifecycle and provider send failures
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No stored authorization, and the interactive grant flow is unavailable in an ephemeral environment")]
    InteractiveAuthUnavailable,

    #[error("Failed to load OAuth client credentials from {path}: {message}")]
    Credentials { path: String, message: String },

    #[error("Token endpoint rejected the request: HTTP {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Failed to persist authorization token to {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Provider rejected the send: HTTP {status}: {body}")]
    Send { status: u16, body: String },

    #[error("HTTP error talking to the provider: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Fauna-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for notifier operations
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

// Re-export commonly used types
pub use config::Config;
pub use handler::{run_digest, DigestOutcome, Trigger};
pub use record::ThreadRecord;
