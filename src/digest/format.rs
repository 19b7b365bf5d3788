//! Digest rendering
//!
//! Two renderings of the same record sequence: an HTML email body and a
//! numbered console listing. Missing fields render as fixed placeholders
//! so the template stays structurally uniform.

use crate::record::ThreadRecord;

/// Fixed message used when no records matched the keywords
pub const NO_MATCHES_MESSAGE: &str = "No new forum posts matching your keywords found.";

/// Renders records as an HTML email body
///
/// Empty input produces [`NO_MATCHES_MESSAGE`] verbatim. Non-empty input
/// produces one section per record in input order: linked title, author,
/// reply and view counts, with a rule between records.
pub fn format_html_digest(records: &[ThreadRecord]) -> String {
    if records.is_empty() {
        return NO_MATCHES_MESSAGE.to_string();
    }

    let mut body = String::new();
    body.push_str("<html><head></head><body>");
    body.push_str("<h1>New Forum Posts</h1>");
    body.push_str("<p>Here are the latest posts matching your keywords:</p>");

    for record in records {
        let title = record.title.as_deref().unwrap_or("No Title");
        let url = record.url.as_deref().unwrap_or("#");
        let author = record.author.as_deref().unwrap_or("Unknown");
        let replies = record.replies.as_deref().unwrap_or("0");
        let views = record.views.as_deref().unwrap_or("0");

        body.push_str(&format!(
            "<h2><a href='{}'>{}</a></h2>",
            escape_html(url),
            escape_html(title)
        ));
        body.push_str(&format!(
            "<p><strong>Author:</strong> {}<br/>",
            escape_html(author)
        ));
        body.push_str(&format!(
            "<strong>Replies:</strong> {} | <strong>Views:</strong> {}</p>",
            escape_html(replies),
            escape_html(views)
        ));
        body.push_str("<hr/>");
    }

    body.push_str("</body></html>");
    body
}

/// Renders records as a numbered console listing
pub fn format_console_listing(records: &[ThreadRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nFound {} threads:\n\n", records.len()));

    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n",
            i + 1,
            record.title.as_deref().unwrap_or("No title")
        ));
        out.push_str(&format!(
            "   Author: {}\n",
            record.author.as_deref().unwrap_or("Unknown")
        ));
        out.push_str(&format!(
            "   Replies: {}, Views: {}\n",
            record.replies.as_deref().unwrap_or("0"),
            record.views.as_deref().unwrap_or("0")
        ));
        out.push_str(&format!(
            "   Last post by: {}\n",
            record.last_poster.as_deref().unwrap_or("Unknown")
        ));
        out.push_str(&format!(
            "   URL: {}\n\n",
            record.url.as_deref().unwrap_or("No URL")
        ));
    }

    out
}

/// Minimal HTML escaping for text and attribute positions
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
