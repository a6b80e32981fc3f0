//! Candidate item production from fetched page bodies.
//!
//! Two modes, chosen by the source configuration:
//!
//! - [`html::extract`] — selector-driven extraction of an ordered post batch
//!   from parsed markup (the common case);
//! - [`json::scalar_at`] — a dot-path walk through a JSON body for sources
//!   that publish a single evolving counter/status field instead of posts.

pub mod html;
pub mod json;

use thiserror::Error;

/// Errors raised while applying extraction rules.
///
/// Selector errors are configuration-class: they mean the channel's rules
/// are unusable, not that the page changed.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A configured CSS selector failed to parse
    #[error("Invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

impl ExtractError {
    pub(crate) fn selector(selector: &str, message: impl ToString) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            message: message.to_string(),
        }
    }
}
