//! Notifier module
//!
//! Authenticates to the mail provider and transmits the formatted
//! digest. Credential lifecycle is handled by an explicit token state
//! machine; the send call is a thin wrapper around the provider API.

mod gmail;
mod token;

pub use gmail::notify;
pub use token::{assess, ensure_access_token, load_token_state, StoredToken, TokenState};

/// Truncates on a char boundary, appending an ellipsis when shortened
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
