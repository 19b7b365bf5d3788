//! Digest pipeline: keyword filtering and report rendering

mod filter;
mod format;

pub use filter::{filter_by_keywords, load_keywords};
pub use format::{format_console_listing, format_html_digest, NO_MATCHES_MESSAGE};
