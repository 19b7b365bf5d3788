//! Triggered entry point
//!
//! Wires walk -> load keywords -> filter -> format -> notify into a
//! single run that always terminates with a structured outcome, the way
//! an external periodic invoker expects it: 200 for success or
//! nothing-to-do, 400 for a keyword-list failure, 500 for an
//! authorization or transmission failure. Fetch failures never abort
//! the run; they only shorten the walk.

use crate::config::Config;
use crate::crawler::{build_http_client, walk};
use crate::digest::{filter_by_keywords, format_html_digest, load_keywords};
use crate::notify::notify;
use serde::Serialize;
use std::path::Path;

/// Opaque trigger payload passed by an external invoker
///
/// Accepted for interface compatibility; the pipeline ignores it.
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    pub event: Option<serde_json::Value>,
    pub context: Option<serde_json::Value>,
}

/// Terminal outcome of a triggered run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestOutcome {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl DigestOutcome {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    fn client_error(body: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
        }
    }

    fn server_error(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }

    /// True for success and nothing-to-do outcomes
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Runs the full digest pipeline
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `_trigger` - Opaque invoker payload, unused by the logic
///
/// # Returns
///
/// A status outcome; this function never panics or returns an error,
/// every failure mode maps to a distinct status code and message
pub async fn run_digest(config: &Config, _trigger: Trigger) -> DigestOutcome {
    tracing::info!("Starting crawler and digest run");

    let client = match build_http_client(&config.fetch) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return DigestOutcome::server_error(format!("Failed to build HTTP client: {}", e));
        }
    };

    // 1. Walk the listing pages; fetch failures shorten, never abort
    let records = walk(&client, config).await;

    // 2. Load keywords; a missing or empty list fails the whole run
    let keywords = match load_keywords(Path::new(&config.output.keywords_path)) {
        Ok(keywords) => keywords,
        Err(e) => {
            tracing::error!("Could not load keywords: {}", e);
            return DigestOutcome::client_error(format!("Failed to load keywords: {}", e));
        }
    };

    // 3. Filter by title keywords
    let matches = filter_by_keywords(records, &keywords);
    if matches.is_empty() {
        tracing::info!("No posts matching keywords found");
        return DigestOutcome::ok("No new posts matching keywords.");
    }
    tracing::info!("Found {} posts matching keywords", matches.len());

    // 4. Format and send the digest
    let body = format_html_digest(&matches);
    match notify(&client, config, &config.email.subject, &body).await {
        Ok(()) => DigestOutcome::ok(format!("Email sent with {} posts.", matches.len())),
        Err(e) => {
            tracing::error!("Failed to send digest: {}", e);
            DigestOutcome::server_error("Failed to send email.")
        }
    }
}
