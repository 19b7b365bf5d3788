//! Crawler module for listing-page fetching and thread extraction
//!
//! This module contains the crawl pipeline's moving parts:
//! - HTTP fetching, direct or proxy-wrapped
//! - Thread extraction from listing markup
//! - The page walker that paces requests and accumulates records

mod extractor;
mod fetcher;
mod walker;

pub use extractor::extract_threads;
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use walker::{page_url, walk};
