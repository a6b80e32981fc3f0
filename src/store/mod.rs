//! On-disk feed state: one JSON file per source.
//!
//! The store owns the accumulated representation of a feed (identity plus
//! its append-only item list) and its create/read/overwrite lifecycle.
//! Everything else in the pipeline treats [`Feed`] as an in-memory value.

mod feed_store;
mod types;

pub use feed_store::{safe_file_name, FeedStore};
pub use types::{Feed, Item, StoreError};
