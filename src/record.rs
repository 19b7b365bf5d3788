//! Thread record data model
//!
//! A `ThreadRecord` is a best-effort snapshot of one thread row on a
//! listing page. Every field is optional: absence means the corresponding
//! markup element was not found. Records carry no identity key, are
//! positional, and are produced fresh each run.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structured summary of one forum thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    /// Thread title text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute thread URL (base origin + extracted relative path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Thread starter's username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Timestamp string of the latest post, as published by the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_time: Option<String>,

    /// Username of the latest poster
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_poster: Option<String>,

    /// Reply count, kept as the display text scraped from the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<String>,

    /// View count, kept as the display text scraped from the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
}

impl ThreadRecord {
    /// Returns true when no field at all was extracted
    ///
    /// Fully empty records are dropped by the extractor; partial records
    /// are kept as-is.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.author.is_none()
            && self.last_post_time.is_none()
            && self.last_poster.is_none()
            && self.replies.is_none()
            && self.views.is_none()
    }
}

/// Saves records to a pretty-printed UTF-8 JSON file
///
/// Non-ASCII text is preserved as-is, not escaped. Fields that were never
/// extracted are omitted from the output, matching the loose shape of the
/// source markup.
pub fn save_records(records: &[ThreadRecord], path: &Path) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    tracing::info!("Saved {} threads to {}", records.len(), path.display());
    Ok(())
}
