//! Mail provider send call
//!
//! Thin wrapper over the provider's `users/me/messages/send` endpoint:
//! wraps the digest in an RFC 2822 message, base64url-encodes it, and
//! posts it with the bearer token produced by the token state machine.
//! Provider-side rejections are reported as [`NotifyError::Send`], never
//! raised past this boundary.

use crate::config::Config;
use crate::notify::token::ensure_access_token;
use crate::notify::truncate;
use crate::NotifyError;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use reqwest::Client;
use serde_json::json;
use std::path::Path;

/// Sends the digest to the configured recipient
///
/// # Arguments
///
/// * `client` - The HTTP client shared across the run
/// * `config` - The run configuration
/// * `subject` - Subject line of the digest
/// * `html_body` - HTML body of the digest
///
/// # Returns
///
/// * `Ok(())` - The provider accepted the message
/// * `Err(NotifyError)` - Credential or transmission failure
pub async fn notify(
    client: &Client,
    config: &Config,
    subject: &str,
    html_body: &str,
) -> Result<(), NotifyError> {
    let email = &config.email;

    let access_token = ensure_access_token(
        client,
        Path::new(&email.token_path),
        Path::new(&email.credentials_path),
        config.runtime.environment,
    )
    .await?;

    let message = build_mime_message(&email.recipient, subject, html_body);
    let raw = URL_SAFE.encode(message);

    let send_url = format!(
        "{}/gmail/v1/users/me/messages/send",
        email.api_base.trim_end_matches('/')
    );

    let response = client
        .post(&send_url)
        .bearer_auth(access_token)
        .json(&json!({ "raw": raw }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body = truncate(&body, 200);
        tracing::error!(
            "Provider rejected the send: HTTP {}: {}",
            status.as_u16(),
            body
        );
        return Err(NotifyError::Send {
            status: status.as_u16(),
            body,
        });
    }

    // Best-effort message id for the log; the sender is the
    // authorized account, set by the provider.
    let message_id = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string));

    match message_id {
        Some(id) => tracing::info!("Email sent, message id {}", id),
        None => tracing::info!("Email sent"),
    }

    Ok(())
}

/// Builds a minimal RFC 2822 message with an HTML body
fn build_mime_message(to: &str, subject: &str, html_body: &str) -> String {
    format!(
        "To: {to}\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\n\
         Content-Type: text/html; charset=utf-8\r\n\r\n{html_body}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_message_shape() {
        let message = build_mime_message(
            "keeper@example.com",
            "New Forum Posts Found!",
            "<html><body>hi</body></html>",
        );

        assert!(message.starts_with("To: keeper@example.com\r\n"));
        assert!(message.contains("Subject: New Forum Posts Found!\r\n"));
        assert!(message.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(message.ends_with("\r\n\r\n<html><body>hi</body></html>"));
    }

    #[test]
    fn test_raw_encoding_roundtrips() {
        let message = build_mime_message("keeper@example.com", "Subject", "body");
        let raw = URL_SAFE.encode(&message);
        let decoded = URL_SAFE.decode(raw).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), message);
    }
}
