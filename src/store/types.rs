use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while persisting feed state.
///
/// Read-side corruption is deliberately NOT an error: `FeedStore::load`
/// self-heals by re-initializing an empty feed (see that method's docs).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while writing the feed file or its directory
    #[error("Feed file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Feed state could not be serialized to JSON
    #[error("Feed serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single feed entry.
///
/// Produced transiently by the extractor on every fetch, and stored verbatim
/// once it survives deduplication. Stored items are append-only: never
/// mutated or reordered after they join a feed.
///
/// Field names mirror the on-disk JSON format (`img`, `pubDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Normalized title; never empty for extractor-produced items
    /// (image-only fragments get a synthesized placeholder title).
    #[serde(default)]
    pub title: String,
    /// Raw description text as extracted; may be empty.
    #[serde(default)]
    pub description: String,
    /// Canonical absolute image URL, or empty.
    #[serde(default)]
    pub img: String,
    /// RFC 2822 timestamp stamped at extraction time.
    #[serde(default, rename = "pubDate")]
    pub pub_date: String,
}

/// Accumulated state of one source's feed: the unit of persistence and the
/// unit of idempotence.
///
/// Identity (`title`, `link`) is fixed when the feed is first created and
/// never altered by subsequent merges. `items` only ever grows, and never
/// holds two entries the duplicate policy considers equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Last observed value for scalar (`jsonPath`) sources; absent for
    /// ordinary markup sources.
    #[serde(
        default,
        rename = "lastScalarValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_scalar_value: Option<String>,
}

impl Feed {
    /// Fresh, empty feed with identity derived from the source id and URL.
    pub fn new(title: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            description: format!("RSS feed for {title}"),
            items: Vec::new(),
            last_scalar_value: None,
        }
    }
}
