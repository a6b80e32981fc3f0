//! pagefeed — turns arbitrary web pages into incrementally-updated RSS feeds.
//!
//! A page that publishes no feed of its own is described by a per-source
//! [`config::SourceConfig`]: a container selector that decides which markup
//! fragments are "posts", plus optional title/text/image selectors. Each
//! refresh runs the same linear pipeline:
//!
//! 1. [`extract`] — apply the selectors to the fetched markup and produce an
//!    ordered batch of candidate items (or, for JSON sources, a single
//!    tracked scalar value);
//! 2. [`normalize`] — canonicalize text and image URLs into comparable forms;
//! 3. [`dedupe`] — drop candidates already represented in the stored feed;
//! 4. [`store`] — append the survivors and persist the whole feed.
//!
//! [`render`] is the read side: it turns a stored feed into an RSS 2.0
//! document on demand. [`pipeline`] wires the steps together around the
//! HTTP fetch.

pub mod config;
pub mod dedupe;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod store;
