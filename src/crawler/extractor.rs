//! Thread extractor for forum listing pages
//!
//! Maps the semi-structured listing markup into [`ThreadRecord`]s. The
//! listing is a sequence of structural thread containers; within each
//! container every field lookup is independent and best-effort, with a
//! fallback strategy where the markup is known to vary. A container that
//! yields nothing at all is dropped; a partial one is kept as-is. A
//! malformed fragment never fails the run.

use crate::record::ThreadRecord;
use scraper::{ElementRef, Html, Selector};

/// Extracts thread records from listing-page markup
///
/// Output preserves the document order of the thread containers.
///
/// # Arguments
///
/// * `markup` - Raw HTML of one listing page
/// * `base_url` - Origin that extracted relative thread paths are joined to
///
/// # Returns
///
/// Zero or more records, one per container that yielded at least one field
pub fn extract_threads(markup: &str, base_url: &str) -> Vec<ThreadRecord> {
    let document = Html::parse_document(markup);

    let Ok(item_selector) = Selector::parse("div.structItem--thread") else {
        return Vec::new();
    };

    document
        .select(&item_selector)
        .filter_map(|item| {
            let record = extract_record(item, base_url);
            if record.is_empty() {
                None
            } else {
                Some(record)
            }
        })
        .collect()
}

/// Extracts one record from a thread container
fn extract_record(item: ElementRef, base_url: &str) -> ThreadRecord {
    let mut record = ThreadRecord::default();

    if let Some(link) = select_title_link(item) {
        record.title = text_of(link);
        record.url = link
            .value()
            .attr("href")
            .map(|href| format!("{}{}", base_url, href));
    }

    // First username in the container is the thread starter
    record.author = select_first(item, "a.username").and_then(text_of);

    if let Some(latest) = select_first(item, "div.structItem-cell--latest") {
        record.last_post_time = select_first(latest, "time")
            .and_then(|el| el.value().attr("datetime"))
            .map(str::to_string);
        record.last_poster = select_first(latest, "a.username").and_then(text_of);
    }

    // Counts are positional within the meta cell: replies first, then
    // views. A cell with fewer elements simply omits the rest.
    if let Some(meta) = select_first(item, "div.structItem-cell--meta") {
        let counts = collect_texts(meta, "dd");
        record.replies = counts.first().cloned();
        record.views = counts.get(1).cloned();
    }

    record
}

/// Title link lookup: primary marker first, heading-nested link as fallback
fn select_title_link(item: ElementRef) -> Option<ElementRef> {
    select_first(item, r#"a[data-tp-primary="on"]"#)
        .or_else(|| select_first(item, "h3.structItem-title a"))
}

fn select_first<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope.select(&sel).next()
}

/// Trimmed text content of an element, or None when blank
fn text_of(element: ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Trimmed text of every match, in document order, blanks included
///
/// Blanks are kept because the caller's interpretation is positional.
fn collect_texts(scope: ElementRef, selector: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}
