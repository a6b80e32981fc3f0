//! Multi-criterion duplicate detection against previously stored items.
//!
//! The historical service grew several dedup heuristics layered over each
//! other; this module is the single consolidated policy. A feed's item list
//! never contains two entries this policy considers equal.

use crate::normalize::normalize_text;
use crate::store::{Feed, Item};

/// Whether `candidate` is already represented by `existing`.
///
/// True iff ANY of:
/// 1. whitespace-normalized titles are equal;
/// 2. image URLs are equal and both non-empty;
/// 3. the candidate's description is whitespace-empty AND it either has no
///    image or shares `existing`'s image — near-empty fragments would
///    otherwise be re-added on every fetch.
fn is_duplicate(candidate: &Item, existing: &Item) -> bool {
    if normalize_text(&candidate.title) == normalize_text(&existing.title) {
        return true;
    }
    if !candidate.img.is_empty() && candidate.img == existing.img {
        return true;
    }
    if normalize_text(&candidate.description).is_empty()
        && (candidate.img.is_empty() || candidate.img == existing.img)
    {
        return true;
    }
    false
}

/// Filters `candidates` down to the ones not already present in `feed`.
///
/// Candidates are compared against the stored items AND against earlier
/// survivors of the same batch, so a single fetch can never introduce two
/// mutual duplicates. Survivors keep their (already ordering-resolved)
/// sequence; the caller appends them at the feed's tail.
pub fn dedupe(candidates: Vec<Item>, feed: &Feed) -> Vec<Item> {
    let mut fresh: Vec<Item> = Vec::new();
    for candidate in candidates {
        let seen = feed
            .items
            .iter()
            .chain(fresh.iter())
            .any(|existing| is_duplicate(&candidate, existing));
        if !seen {
            fresh.push(candidate);
        }
    }
    fresh
}

/// Scalar-mode equality: accepts the observed value only when it differs
/// from the feed's last recorded one.
///
/// Returns the normalized value to record (as both the new item's title and
/// the feed's `lastScalarValue`), or `None` when nothing changed.
pub fn scalar_update(value: &str, feed: &Feed) -> Option<String> {
    let normalized = normalize_text(value);
    let previous = feed.last_scalar_value.as_deref().unwrap_or("");
    if normalized == normalize_text(previous) {
        None
    } else {
        Some(normalized)
    }
}
