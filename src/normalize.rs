//! Pure canonicalization of extracted text and image URLs.
//!
//! Markup sources mix absolute, root-relative, and bare-relative image
//! references, and their text nodes carry arbitrary indentation. Feed
//! consumers need stable absolute URLs, and the duplicate policy in
//! [`crate::dedupe`] compares canonical forms to avoid false negatives.

use url::{Position, Url};

/// Collapses every whitespace run to a single space and trims the ends.
///
/// Empty or whitespace-only input yields `""`.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a raw image reference into a canonical absolute URL.
///
/// - `data:` URLs (embedded binary) are rejected → `""`
/// - an absolute URL is returned in its canonical serialization
/// - a root-relative path (`/a.png`) resolves against the origin of
///   `page_url`
/// - anything else is treated as origin-relative (`origin + "/" + raw`),
///   matching the historical feed output rather than standard path-relative
///   resolution
/// - unparseable or empty input → `""`
pub fn normalize_image_url(raw: &str, page_url: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return String::new();
    }

    if let Ok(url) = Url::parse(raw) {
        return url.to_string();
    }

    let page = match Url::parse(page_url) {
        Ok(u) => u,
        Err(_) => return String::new(),
    };
    let origin = &page[..Position::BeforePath];

    let joined = if raw.starts_with('/') {
        format!("{origin}{raw}")
    } else {
        format!("{origin}/{raw}")
    };

    match Url::parse(&joined) {
        Ok(url) => url.to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_text_collapses_runs() {
        assert_eq!(normalize_text("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_text("already clean"), "already clean");
    }

    #[test]
    fn test_normalize_text_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \n\t  "), "");
    }

    #[test]
    fn test_root_relative_resolves_against_origin() {
        assert_eq!(
            normalize_image_url("/a.png", "http://site.com/page"),
            "http://site.com/a.png"
        );
        assert_eq!(
            normalize_image_url("/img/b.png", "http://site.com/deep/page.html"),
            "http://site.com/img/b.png"
        );
    }

    #[test]
    fn test_bare_relative_resolves_against_origin_not_path() {
        // Historical policy: origin + "/" + raw, ignoring the page's path.
        assert_eq!(
            normalize_image_url("a.png", "http://site.com/deep/page.html"),
            "http://site.com/a.png"
        );
    }

    #[test]
    fn test_absolute_url_passes_through() {
        assert_eq!(
            normalize_image_url("http://cdn.com/b.png", "http://site.com"),
            "http://cdn.com/b.png"
        );
    }

    #[test]
    fn test_data_url_rejected() {
        assert_eq!(
            normalize_image_url("data:image/png;base64,AAAA", "http://site.com"),
            ""
        );
    }

    #[test]
    fn test_empty_and_unparseable_inputs() {
        assert_eq!(normalize_image_url("", "http://site.com"), "");
        assert_eq!(normalize_image_url("   ", "http://site.com"), "");
        assert_eq!(normalize_image_url("a.png", "not a url"), "");
    }

    #[test]
    fn test_port_preserved_in_origin() {
        assert_eq!(
            normalize_image_url("/x.png", "http://site.com:8080/page"),
            "http://site.com:8080/x.png"
        );
    }

    proptest! {
        #[test]
        fn normalize_text_is_idempotent(s in ".*") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn normalize_text_never_has_edge_or_double_spaces(s in ".*") {
            let out = normalize_text(&s);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
