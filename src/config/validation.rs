use crate::config::types::{Config, EmailConfig, FetchConfig, FetchMode, ForumConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_forum_config(&config.forum)?;
    validate_fetch_config(&config.fetch)?;
    validate_email_config(&config.email)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl target configuration
fn validate_forum_config(config: &ForumConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must be an http(s) URL, got '{}'",
            config.base_url
        )));
    }

    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(
            "base-url must not end with '/' (listing-path supplies the leading slash)".to_string(),
        ));
    }

    if !config.listing_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing-path must start with '/', got '{}'",
            config.listing_path
        )));
    }

    if config.page_count < 1 {
        return Err(ConfigError::Validation(format!(
            "page-count must be >= 1, got {}",
            config.page_count
        )));
    }

    Ok(())
}

/// Validates the fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.mode == FetchMode::Proxy {
        Url::parse(&config.proxy_endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy-endpoint: {}", e)))?;

        if config.proxy_zone.is_empty() {
            return Err(ConfigError::Validation(
                "proxy-zone cannot be empty".to_string(),
            ));
        }

        // A missing token is a hard configuration error, not something
        // to paper over with a baked-in default.
        match &config.proxy_token {
            Some(token) if !token.is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "proxy mode requires a proxy-token (set it in the config file \
                     or via FAUNA_WATCH_PROXY_TOKEN)"
                        .to_string(),
                ))
            }
        }
    }

    Ok(())
}

/// Validates the email configuration
fn validate_email_config(config: &EmailConfig) -> Result<(), ConfigError> {
    validate_email(&config.recipient)?;

    if config.subject.is_empty() {
        return Err(ConfigError::Validation(
            "subject cannot be empty".to_string(),
        ));
    }

    if config.token_path.is_empty() {
        return Err(ConfigError::Validation(
            "token-path cannot be empty".to_string(),
        ));
    }

    if config.credentials_path.is_empty() {
        return Err(ConfigError::Validation(
            "credentials-path cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api-base: {}", e)))?;

    Ok(())
}

/// Validates file path configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.keywords_path.is_empty() {
        return Err(ConfigError::Validation(
            "keywords-path cannot be empty".to_string(),
        ));
    }

    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "recipient cannot be empty".to_string(),
        ));
    }

    // Basic format check: must contain @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid recipient address: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid recipient address: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("keeper@example.com").is_ok());
        assert!(validate_email("keeper@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("keeper@").is_err());
        assert!(validate_email("keeper@domain").is_err());
    }
}
