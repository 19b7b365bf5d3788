use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable consulted when the config file carries no
/// proxy token
pub const PROXY_TOKEN_ENV: &str = "FAUNA_WATCH_PROXY_TOKEN";

/// Loads and parses a configuration file from the given path
///
/// The proxy token may come from the file or from the
/// [`PROXY_TOKEN_ENV`] environment variable; the file takes precedence.
/// The result is validated before being returned.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // Fill the proxy token from the environment if the file left it out
    if config.fetch.proxy_token.is_none() {
        if let Ok(token) = std::env::var(PROXY_TOKEN_ENV) {
            if !token.is_empty() {
                config.fetch.proxy_token = Some(token);
            }
        }
    }

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}
