use std::path::{Path, PathBuf};

use super::types::{Feed, StoreError};

/// Maps a source identifier to a stable, filesystem-safe stem.
///
/// Strips `http(s)://` prefixes and `.html` suffixes, lowercases, and maps
/// every non-alphanumeric character to `_`. Kept byte-compatible with the
/// historical file naming so existing feed files remain addressable.
pub fn safe_file_name(source_id: &str) -> String {
    source_id
        .replace("https://", "")
        .replace("http://", "")
        .replace(".html", "")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Whole-file JSON persistence for feed state, one file per source.
///
/// Load-then-save is NOT atomic at this layer; the pipeline serializes
/// writers per source so a refresh never races itself within the process.
#[derive(Debug, Clone)]
pub struct FeedStore {
    data_dir: PathBuf,
}

impl FeedStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the feed file backing `source_id`.
    pub fn feed_path(&self, source_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", safe_file_name(source_id)))
    }

    /// Reads persisted state for `source_id`.
    ///
    /// An absent, unreadable, or malformed file re-initializes an empty feed
    /// from the supplied defaults rather than blocking ingestion. Corruption
    /// is logged loudly because the recovery discards history.
    pub async fn load(&self, source_id: &str, default_title: &str, default_link: &str) -> Feed {
        let path = self.feed_path(source_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(source = %source_id, path = %path.display(), "No stored feed, starting empty");
                return Feed::new(default_title, default_link);
            }
            Err(e) => {
                tracing::warn!(
                    source = %source_id,
                    path = %path.display(),
                    error = %e,
                    "Stored feed unreadable, re-initializing empty feed (history discarded)"
                );
                return Feed::new(default_title, default_link);
            }
        };

        match serde_json::from_slice::<Feed>(&bytes) {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!(
                    source = %source_id,
                    path = %path.display(),
                    error = %e,
                    "Stored feed malformed, re-initializing empty feed (history discarded)"
                );
                Feed::new(default_title, default_link)
            }
        }
    }

    /// Serializes and persists the full feed, overwriting any prior state.
    pub async fn save(&self, source_id: &str, feed: &Feed) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.feed_path(source_id);
        let json = serde_json::to_vec_pretty(feed)?;
        tokio::fs::write(&path, json).await?;
        tracing::debug!(
            source = %source_id,
            path = %path.display(),
            items = feed.items.len(),
            "Persisted feed"
        );
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Item;
    use pretty_assertions::assert_eq;

    fn test_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pagefeed_store_test_{name}"))
    }

    #[test]
    fn test_safe_file_name_strips_scheme_and_html() {
        assert_eq!(safe_file_name("http://Site.com/News.html"), "site_com_news");
        assert_eq!(safe_file_name("https://a.b/c?d=1"), "a_b_c_d_1");
        assert_eq!(safe_file_name("my-channel"), "my_channel");
    }

    #[tokio::test]
    async fn test_load_missing_returns_empty_with_defaults() {
        let store = FeedStore::new(test_dir("missing"));
        let feed = store.load("nope", "nope", "http://example.com").await;
        assert_eq!(feed.title, "nope");
        assert_eq!(feed.link, "http://example.com");
        assert_eq!(feed.description, "RSS feed for nope");
        assert!(feed.items.is_empty());
        assert!(feed.last_scalar_value.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = test_dir("roundtrip");
        let store = FeedStore::new(&dir);

        let mut feed = Feed::new("chan", "http://example.com/page");
        feed.items.push(Item {
            title: "First".into(),
            description: "body".into(),
            img: "http://example.com/a.png".into(),
            pub_date: "Thu, 01 Jan 2026 00:00:00 +0000".into(),
        });
        store.save("chan", &feed).await.unwrap();

        let loaded = store.load("chan", "other", "http://other").await;
        assert_eq!(loaded, feed);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_corrupt_file_reinitializes() {
        let dir = test_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let store = FeedStore::new(&dir);
        std::fs::write(store.feed_path("chan"), "{not json").unwrap();

        let feed = store.load("chan", "chan", "http://example.com").await;
        assert!(feed.items.is_empty());
        assert_eq!(feed.title, "chan");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_file_format_field_names() {
        let dir = test_dir("format");
        let store = FeedStore::new(&dir);

        let mut feed = Feed::new("chan", "http://example.com");
        feed.items.push(Item {
            title: "T".into(),
            description: String::new(),
            img: "http://example.com/i.png".into(),
            pub_date: "Thu, 01 Jan 2026 00:00:00 +0000".into(),
        });
        store.save("chan", &feed).await.unwrap();

        let raw = std::fs::read_to_string(store.feed_path("chan")).unwrap();
        assert!(raw.contains("\"pubDate\""));
        assert!(raw.contains("\"img\""));
        // Absent scalar value is omitted entirely, not written as null.
        assert!(!raw.contains("lastScalarValue"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
