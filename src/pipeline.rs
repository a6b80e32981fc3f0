//! The fetch-and-merge pipeline: one linear pass per invocation.
//!
//! fetch remote page → extract → dedupe against loaded state → persist.
//! Each refresh touches exactly one source; a failure is local to that
//! source and the caller decides whether to continue with others. There is
//! no retry policy here — retries belong to whatever schedules invocations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::SourceConfig;
use crate::dedupe::{dedupe, scalar_update};
use crate::extract::{html, json, ExtractError};
use crate::store::{Feed, FeedStore, Item, StoreError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during a single source refresh.
///
/// `NoPosts` is informational rather than fatal: zero extracted candidates
/// usually means the page changed under the configured selectors, and
/// operators want to see that without the whole run failing.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The channel configuration carries no source URL; nothing is fetched
    #[error("Channel {0:?} has no source URL configured")]
    MissingUrl(String),
    /// A configured CSS selector failed to parse
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Scalar-mode body could not be parsed as JSON
    #[error("Body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Zero candidates extracted: the selectors (or JSON path) matched
    /// nothing, likely selector drift
    #[error("No posts found for channel {channel:?} with {selector:?}")]
    NoPosts { channel: String, selector: String },
    /// Persisting the merged feed failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RefreshError {
    /// Non-fatal informational outcome (prior state untouched).
    pub fn is_empty_extraction(&self) -> bool {
        matches!(self, Self::NoPosts { .. })
    }
}

/// Result of a successful refresh.
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Number of genuinely new items appended to the feed this run
    pub new_items: usize,
    /// The merged feed state (persisted unless the run was a preview)
    pub feed: Feed,
}

/// Drives the extraction–normalization–deduplication–persistence sequence
/// for individual sources.
///
/// Holds a per-source async mutex registry: the store's load-then-save is
/// not atomic on its own, so refreshes of the same channel are serialized
/// within this process to keep last-write-wins races out of normal
/// operation. Distinct channels proceed concurrently.
pub struct Pipeline {
    client: reqwest::Client,
    store: FeedStore,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Pipeline {
    pub fn new(client: reqwest::Client, store: FeedStore) -> Self {
        Self {
            client,
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Fetches `config.url`, extracts candidates, merges the unseen ones
    /// into the channel's stored feed, and persists the result.
    ///
    /// With `persist == false` the merge happens purely in memory — the
    /// non-destructive "test this source configuration" mode.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::MissingUrl`] — no URL configured, nothing fetched
    /// - [`RefreshError::Extract`] — unusable CSS selector
    /// - [`RefreshError::Network`] / [`RefreshError::Timeout`] /
    ///   [`RefreshError::HttpStatus`] — fetch failed, nothing persisted
    /// - [`RefreshError::InvalidJson`] — scalar-mode body was not JSON
    /// - [`RefreshError::NoPosts`] — zero candidates (informational; prior
    ///   state untouched)
    /// - [`RefreshError::Store`] — persisting the merged feed failed
    pub async fn refresh(
        &self,
        channel_id: &str,
        config: &SourceConfig,
        persist: bool,
    ) -> Result<RefreshOutcome, RefreshError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(RefreshError::MissingUrl(channel_id.to_string()));
        }

        let lock = self.lock_for(channel_id).await;
        let _guard = lock.lock().await;

        let body = self.fetch(url).await?;
        let mut feed = self.store.load(channel_id, channel_id, url).await;

        let new_items = if let Some(path) = config.json_path() {
            self.merge_scalar(channel_id, path, &body, &mut feed)?
        } else {
            self.merge_markup(channel_id, config, &body, &mut feed)?
        };

        if persist {
            self.store.save(channel_id, &feed).await?;
        }

        tracing::info!(
            channel = %channel_id,
            new_items = new_items,
            total = feed.items.len(),
            persisted = persist,
            "Refresh complete"
        );

        Ok(RefreshOutcome { new_items, feed })
    }

    /// Markup mode: selector extraction then the multi-criterion dedup.
    fn merge_markup(
        &self,
        channel_id: &str,
        config: &SourceConfig,
        body: &str,
        feed: &mut Feed,
    ) -> Result<usize, RefreshError> {
        let candidates = html::extract(body, config, Utc::now())?;
        if candidates.is_empty() {
            return Err(RefreshError::NoPosts {
                channel: channel_id.to_string(),
                selector: config.container().to_string(),
            });
        }

        // New items always join at the tail; newestFirst only resolved
        // intra-batch ordering inside the extractor.
        let fresh = dedupe(candidates, feed);
        let appended = fresh.len();
        feed.items.extend(fresh);
        Ok(appended)
    }

    /// Scalar mode: one tracked value, appended as an item only on change.
    fn merge_scalar(
        &self,
        channel_id: &str,
        path: &str,
        body: &str,
        feed: &mut Feed,
    ) -> Result<usize, RefreshError> {
        let parsed: serde_json::Value = serde_json::from_str(body)?;
        let value = json::scalar_at(&parsed, path).ok_or_else(|| RefreshError::NoPosts {
            channel: channel_id.to_string(),
            selector: path.to_string(),
        })?;

        match scalar_update(&value, feed) {
            Some(changed) => {
                feed.items.push(Item {
                    title: changed.clone(),
                    description: String::new(),
                    img: String::new(),
                    pub_date: Utc::now().to_rfc2822(),
                });
                feed.last_scalar_value = Some(changed);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, RefreshError> {
        let response = tokio::time::timeout(FETCH_TIMEOUT, self.client.get(url).send())
            .await
            .map_err(|_| RefreshError::Timeout)?
            .map_err(RefreshError::Network)?;

        if !response.status().is_success() {
            return Err(RefreshError::HttpStatus(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    async fn lock_for(&self, channel_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(channel_id.to_string()).or_default().clone()
    }
}
