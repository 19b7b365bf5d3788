//! Configuration module for Fauna-Watch
//!
//! This module handles loading, parsing, and validating TOML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use fauna_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Listing URL: {}", config.forum.listing_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EmailConfig, Environment, FetchConfig, FetchMode, ForumConfig, OutputConfig,
    RuntimeConfig,
};

// Re-export parser functions
pub use parser::{load_config, PROXY_TOKEN_ENV};

// Re-export validation
pub use validation::validate;
