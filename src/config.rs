//! Per-source extraction rules and the channels file that carries them.
//!
//! The channels file is a JSON object mapping a channel id to its
//! [`SourceConfig`]. It is owned by the external channel-management layer;
//! this crate only reads it. Unknown keys (the channel editor stores extra
//! presentation fields) are silently ignored by serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read channels file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in channels file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Source Configuration
// ============================================================================

/// Extraction rules for one source, immutable per invocation.
///
/// Selectors are CSS selectors evaluated against the fetched page. An empty
/// string is treated the same as an absent selector throughout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceConfig {
    /// The single fixed URL this source is fetched from.
    pub url: String,
    /// Selector deciding which elements are posts; defaults to `body`
    /// (the whole document acts as a single container).
    pub container: Option<String>,
    /// Selector for the post title within a container element.
    pub title: Option<String>,
    /// Selector for the post description text within a container element.
    pub text: Option<String>,
    /// Selector for the post image within a container element; when absent
    /// the first `img` descendant is used.
    pub img: Option<String>,
    /// When true, the page lists newest posts first and the extracted batch
    /// is reversed so the pipeline always sees oldest-to-newest order.
    pub newest_first: bool,
    /// Dot-delimited path into a JSON body (e.g. `a.b.c`). When set, the
    /// source is in scalar mode: the addressed value is tracked as a single
    /// evolving item instead of a post list.
    pub json_path: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SourceConfig {
    pub fn container(&self) -> &str {
        non_empty(&self.container).unwrap_or("body")
    }

    pub fn title_selector(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn text_selector(&self) -> Option<&str> {
        non_empty(&self.text)
    }

    pub fn img_selector(&self) -> Option<&str> {
        non_empty(&self.img)
    }

    pub fn json_path(&self) -> Option<&str> {
        non_empty(&self.json_path)
    }
}

/// Loads the channels file: a JSON map of channel id to [`SourceConfig`].
pub fn load_channels(path: &Path) -> Result<BTreeMap<String, SourceConfig>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let channels = serde_json::from_str(&content)?;
    Ok(channels)
}

// ============================================================================
// Tests
// ============================================================================
