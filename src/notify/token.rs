//! Authorization token lifecycle
//!
//! The stored authorization artifact moves through an explicit state
//! machine: `NoCredential` -> (interactive grant) -> `Valid`, and
//! `Valid` -> `Expired` -> (silent refresh) -> `Valid`. Whether a
//! refreshed artifact is written back is decided by the injected
//! environment capability, never by sniffing process environment
//! variables inside the logic.

use crate::config::Environment;
use crate::notify::truncate;
use crate::NotifyError;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Stored authorization artifact
///
/// Carries everything needed to use and silently refresh the grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub client_id: String,
    pub client_secret: String,
    pub token_uri: String,

    /// Expiry instant; a token without one is assumed usable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Lifecycle state of the stored authorization
#[derive(Debug)]
pub enum TokenState {
    /// No usable artifact on disk
    NoCredential,
    /// Artifact present and not expired
    Valid(StoredToken),
    /// Artifact present but past its expiry
    Expired(StoredToken),
}

/// Safety margin subtracted from the expiry instant
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Scope requested from the provider: send-only mail access
const MAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

/// Redirect used when the client credentials file names none
const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Loads the stored token and classifies it against the clock
///
/// A missing or unreadable file is `NoCredential`; an invalid file is
/// logged and treated the same way.
pub fn load_token_state(path: &Path, now: DateTime<Utc>) -> TokenState {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return TokenState::NoCredential,
    };

    match serde_json::from_str::<StoredToken>(&content) {
        Ok(token) => assess(token, now),
        Err(e) => {
            tracing::warn!(
                "Stored token at {} is invalid ({}), ignoring it",
                path.display(),
                e
            );
            TokenState::NoCredential
        }
    }
}

/// Classifies a token against the clock
pub fn assess(token: StoredToken, now: DateTime<Utc>) -> TokenState {
    match token.expiry {
        Some(expiry) if expiry - Duration::seconds(EXPIRY_MARGIN_SECS) <= now => {
            TokenState::Expired(token)
        }
        _ => TokenState::Valid(token),
    }
}

/// Produces a usable access token, walking the credential state machine
///
/// # State transitions
///
/// | State | Refresh token | Environment | Action |
/// |-------|---------------|-------------|--------|
/// | Valid | - | - | Use as-is |
/// | Expired | present | interactive | Refresh, persist |
/// | Expired | present | ephemeral | Refresh, use once |
/// | Expired | absent | interactive | Interactive grant, persist |
/// | NoCredential | - | interactive | Interactive grant, persist |
/// | NoCredential / unrefreshable | - | ephemeral | Fail fast |
///
/// # Arguments
///
/// * `client` - The HTTP client to use for token-endpoint calls
/// * `token_path` - Path of the stored authorization artifact
/// * `credentials_path` - Path of the OAuth client credentials file
/// * `environment` - Writability capability of the execution context
pub async fn ensure_access_token(
    client: &Client,
    token_path: &Path,
    credentials_path: &Path,
    environment: Environment,
) -> Result<String, NotifyError> {
    match load_token_state(token_path, Utc::now()) {
        TokenState::Valid(token) => Ok(token.access_token),

        TokenState::Expired(token) => match token.refresh_token.clone() {
            Some(refresh) => {
                let refreshed = refresh_access_token(client, &token, &refresh).await?;
                if environment.is_writable() {
                    persist_token(token_path, &refreshed)?;
                } else {
                    tracing::debug!(
                        "Ephemeral environment, using refreshed token without persisting"
                    );
                }
                Ok(refreshed.access_token)
            }
            None => interactive_grant(client, token_path, credentials_path, environment).await,
        },

        TokenState::NoCredential => {
            interactive_grant(client, token_path, credentials_path, environment).await
        }
    }
}

/// Response of the provider's token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Silently exchanges a refresh token for a fresh access token
async fn refresh_access_token(
    client: &Client,
    token: &StoredToken,
    refresh: &str,
) -> Result<StoredToken, NotifyError> {
    tracing::info!("Refreshing expired access token");

    let params = [
        ("client_id", token.client_id.as_str()),
        ("client_secret", token.client_secret.as_str()),
        ("refresh_token", refresh),
        ("grant_type", "refresh_token"),
    ];

    let response = client.post(&token.token_uri).form(&params).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NotifyError::TokenEndpoint {
            status: status.as_u16(),
            body: truncate(&body, 200),
        });
    }

    let granted: TokenResponse = response.json().await?;
    Ok(StoredToken {
        access_token: granted.access_token,
        // The endpoint may omit the refresh token; keep the old one
        refresh_token: granted.refresh_token.or_else(|| Some(refresh.to_string())),
        client_id: token.client_id.clone(),
        client_secret: token.client_secret.clone(),
        token_uri: token.token_uri.clone(),
        expiry: granted.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
    })
}

/// OAuth client credentials file (installed-application shape)
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: InstalledClient,
}

#[derive(Debug, Deserialize)]
struct InstalledClient {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Runs the interactive consent flow and persists the resulting token
///
/// Requires a console; in an ephemeral execution context this fails
/// fast with a clear error instead of hanging on a prompt.
async fn interactive_grant(
    client: &Client,
    token_path: &Path,
    credentials_path: &Path,
    environment: Environment,
) -> Result<String, NotifyError> {
    if environment == Environment::Ephemeral {
        return Err(NotifyError::InteractiveAuthUnavailable);
    }

    let installed = read_credentials(credentials_path)?;
    let redirect_uri = installed
        .redirect_uris
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_REDIRECT_URI);

    let auth_url = url::Url::parse_with_params(
        &installed.auth_uri,
        &[
            ("client_id", installed.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", MAIL_SEND_SCOPE),
            ("access_type", "offline"),
        ],
    )
    .map_err(|e| NotifyError::Credentials {
        path: credentials_path.display().to_string(),
        message: format!("invalid auth_uri: {}", e),
    })?;

    println!("Open this URL in a browser and authorize access:\n\n  {}\n", auth_url);
    print!("Paste the authorization code here: ");
    std::io::stdout().flush()?;

    let mut code = String::new();
    std::io::stdin().read_line(&mut code)?;
    let code = code.trim();

    let params = [
        ("client_id", installed.client_id.as_str()),
        ("client_secret", installed.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri),
    ];

    let response = client.post(&installed.token_uri).form(&params).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NotifyError::TokenEndpoint {
            status: status.as_u16(),
            body: truncate(&body, 200),
        });
    }

    let granted: TokenResponse = response.json().await?;
    let token = StoredToken {
        access_token: granted.access_token,
        refresh_token: granted.refresh_token,
        client_id: installed.client_id,
        client_secret: installed.client_secret,
        token_uri: installed.token_uri,
        expiry: granted.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
    };

    persist_token(token_path, &token)?;
    Ok(token.access_token)
}

fn read_credentials(path: &Path) -> Result<InstalledClient, NotifyError> {
    let content = std::fs::read_to_string(path).map_err(|e| NotifyError::Credentials {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let file: CredentialsFile =
        serde_json::from_str(&content).map_err(|e| NotifyError::Credentials {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(file.installed)
}

/// Writes the token artifact back for reuse in later runs
fn persist_token(path: &Path, token: &StoredToken) -> Result<(), NotifyError> {
    let json = serde_json::to_string_pretty(token)?;
    std::fs::write(path, json).map_err(|source| NotifyError::Persist {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("Stored authorization token at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored_token(expiry: Option<DateTime<Utc>>, refresh: Option<&str>) -> StoredToken {
        StoredToken {
            access_token: "access-123".to_string(),
            refresh_token: refresh.map(str::to_string),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            token_uri: "https://oauth2.example.com/token".to_string(),
            expiry,
        }
    }

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_assess_future_expiry_is_valid() {
        let token = stored_token(Some(at(2099, 1, 1)), None);
        assert!(matches!(assess(token, at(2025, 1, 1)), TokenState::Valid(_)));
    }

    #[test]
    fn test_assess_past_expiry_is_expired() {
        let token = stored_token(Some(at(2025, 1, 1)), None);
        assert!(matches!(
            assess(token, at(2025, 6, 1)),
            TokenState::Expired(_)
        ));
    }

    #[test]
    fn test_assess_expiry_within_margin_is_expired() {
        let now = at(2025, 1, 1);
        let token = stored_token(Some(now + Duration::seconds(30)), None);
        assert!(matches!(assess(token, now), TokenState::Expired(_)));
    }

    #[test]
    fn test_assess_token_without_expiry_is_valid() {
        let token = stored_token(None, None);
        assert!(matches!(assess(token, at(2025, 1, 1)), TokenState::Valid(_)));
    }

    #[test]
    fn test_load_token_state_missing_file() {
        let state = load_token_state(Path::new("/nonexistent/token.json"), Utc::now());
        assert!(matches!(state, TokenState::NoCredential));
    }

    #[test]
    fn test_load_token_state_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = load_token_state(&path, Utc::now());
        assert!(matches!(state, TokenState::NoCredential));
    }

    #[test]
    fn test_token_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        let token = stored_token(Some(at(2099, 1, 1)), Some("refresh-456"));
        persist_token(&path, &token).unwrap();

        match load_token_state(&path, at(2025, 1, 1)) {
            TokenState::Valid(loaded) => {
                assert_eq!(loaded.access_token, "access-123");
                assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-456"));
            }
            other => panic!("expected Valid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_credential_fails_fast_in_ephemeral_environment() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        let result = ensure_access_token(
            &client,
            &dir.path().join("token.json"),
            &dir.path().join("credentials.json"),
            Environment::Ephemeral,
        )
        .await;

        assert!(matches!(
            result,
            Err(NotifyError::InteractiveAuthUnavailable)
        ));
    }
}
