//! Forum walker
//!
//! Drives the fetcher across a bounded sequence of listing pages,
//! accumulating thread records. A failed page stops the walk immediately;
//! whatever was accumulated before the failure is the result, not an
//! error. A fixed polite delay separates successful page fetches.

use crate::config::Config;
use crate::crawler::extractor::extract_threads;
use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::record::ThreadRecord;
use reqwest::Client;
use std::time::Duration;

/// URL of the given 1-based listing page
///
/// Page 1 is the listing URL verbatim; later pages append a page-number
/// path segment.
pub fn page_url(listing_url: &str, page: u32) -> String {
    if page <= 1 {
        listing_url.to_string()
    } else {
        format!("{}page-{}", listing_url, page)
    }
}

/// Walks the configured number of listing pages and accumulates records
///
/// # Arguments
///
/// * `client` - The HTTP client shared across the run
/// * `config` - The crawler configuration
///
/// # Returns
///
/// All records discovered before the first failing page, in
/// page-then-document order
pub async fn walk(client: &Client, config: &Config) -> Vec<ThreadRecord> {
    let listing_url = config.forum.listing_url();
    let mut all_threads = Vec::new();

    for page in 1..=config.forum.page_count {
        let url = page_url(&listing_url, page);
        tracing::info!("Crawling page {}...", page);

        match fetch_page(client, &config.fetch, &url).await {
            FetchResult::Success { body } => {
                let threads = extract_threads(&body, &config.forum.base_url);
                tracing::info!("Found {} threads on page {}", threads.len(), page);
                all_threads.extend(threads);

                // Polite pause between pages, skipped after the last one
                if page < config.forum.page_count {
                    tokio::time::sleep(Duration::from_millis(config.forum.page_delay_ms)).await;
                }
            }
            _ => {
                tracing::warn!("Failed to fetch page {}, stopping walk", page);
                break;
            }
        }
    }

    all_threads
}
