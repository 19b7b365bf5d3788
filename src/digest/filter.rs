//! Keyword loading and title filtering
//!
//! The keyword list is a JSON array of strings loaded once per run. A
//! record is retained iff at least one keyword is a case-folded
//! substring of its title; the list is a set of OR'd probes with no
//! stemming, word boundaries, or ranking.

use crate::record::ThreadRecord;
use crate::KeywordError;
use std::path::Path;

/// Loads the keyword list from a JSON file
///
/// # Arguments
///
/// * `path` - Path to a JSON array of keyword strings
///
/// # Returns
///
/// * `Ok(Vec<String>)` - At least one keyword
/// * `Err(KeywordError)` - Missing file, malformed JSON, or an empty list
pub fn load_keywords(path: &Path) -> Result<Vec<String>, KeywordError> {
    let content = std::fs::read_to_string(path).map_err(|source| KeywordError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let keywords: Vec<String> =
        serde_json::from_str(&content).map_err(|source| KeywordError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    // An empty list would filter everything out; surface it as a load
    // failure instead of a silent no-op run.
    if keywords.is_empty() {
        return Err(KeywordError::Empty(path.display().to_string()));
    }

    Ok(keywords)
}

/// Retains records whose title contains any keyword, case-insensitively
///
/// Records without a title never match. Input order is preserved.
pub fn filter_by_keywords(records: Vec<ThreadRecord>, keywords: &[String]) -> Vec<ThreadRecord> {
    let probes: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    records
        .into_iter()
        .filter(|record| {
            record.title.as_ref().is_some_and(|title| {
                let title = title.to_lowercase();
                probes.iter().any(|probe| title.contains(probe))
            })
        })
        .collect()
}
