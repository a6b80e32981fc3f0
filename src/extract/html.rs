//! Selector-driven extraction of candidate items from parsed markup.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

use super::ExtractError;
use crate::config::SourceConfig;
use crate::normalize::{normalize_image_url, normalize_text};
use crate::store::Item;

/// Placeholder title for an image-only fragment.
///
/// Embeds the normalized image URL so the item still has a stable, non-empty
/// dedup key. Kept as a named function because the synthesized text is
/// observable in feed output and must stay backward compatible.
fn image_placeholder_title(img: &str) -> String {
    format!("Image: {img}")
}

fn parse_selector(s: &str) -> Result<Selector, ExtractError> {
    Selector::parse(s).map_err(|e| ExtractError::selector(s, e))
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Applies a source's selector rules to `markup` and produces the ordered
/// candidate batch.
///
/// Elements matching the container selector are visited in document order.
/// Titles are whitespace-normalized, image URLs canonicalized against the
/// source URL, descriptions kept raw (the dedup policy applies its own
/// whitespace checks and the renderer emits the raw text). Fragments with
/// neither title nor image are discarded as noise.
///
/// The sequence leaving this function is always oldest-to-newest: when
/// `newestFirst` is set the document-order batch is reversed, so appending
/// downstream is order-safe regardless of how the page sorts its posts.
pub fn extract(
    markup: &str,
    config: &SourceConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Item>, ExtractError> {
    let container = parse_selector(config.container())?;
    let title_sel = config.title_selector().map(parse_selector).transpose()?;
    let text_sel = config.text_selector().map(parse_selector).transpose()?;
    let img_sel = match config.img_selector() {
        Some(s) => parse_selector(s)?,
        // Fall back to the first img descendant when nothing is configured.
        None => parse_selector("img")?,
    };

    let document = Html::parse_document(markup);
    let pub_date = now.to_rfc2822();

    let mut items = Vec::new();
    for element in document.select(&container) {
        let raw_title = match &title_sel {
            Some(sel) => first_text(element, sel).unwrap_or_default(),
            None => element.text().collect::<String>(),
        };
        let title = normalize_text(&raw_title);

        let description = match &text_sel {
            Some(sel) => first_text(element, sel).unwrap_or_default(),
            None => String::new(),
        };

        let img = element
            .select(&img_sel)
            .next()
            .and_then(|el| el.value().attr("src"))
            .map(|src| normalize_image_url(src, &config.url))
            .unwrap_or_default();

        // Neither a title nor an image: noise, not a post.
        if title.is_empty() && img.is_empty() {
            continue;
        }

        let title = if title.is_empty() {
            image_placeholder_title(&img)
        } else {
            title
        };

        items.push(Item {
            title,
            description,
            img,
            pub_date: pub_date.clone(),
        });
    }

    if config.newest_first {
        items.reverse();
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(container: &str, title: &str, text: &str, img: &str) -> SourceConfig {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        SourceConfig {
            url: "http://site.com/page".into(),
            container: opt(container),
            title: opt(title),
            text: opt(text),
            img: opt(img),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    const PAGE: &str = r#"<html><body>
        <div class="post">
            <h2>  First   post </h2>
            <p class="body">Some
               text</p>
            <img src="/a.png">
        </div>
        <div class="post">
            <h2>Second post</h2>
            <p class="body">More text</p>
            <img src="http://cdn.com/b.png">
        </div>
    </body></html>"#;

    #[test]
    fn test_extracts_in_document_order() {
        let items = extract(PAGE, &config(".post", "h2", "p.body", ""), now()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First post");
        assert_eq!(items[1].title, "Second post");
    }

    #[test]
    fn test_title_is_whitespace_normalized_description_raw() {
        let items = extract(PAGE, &config(".post", "h2", "p.body", ""), now()).unwrap();
        assert_eq!(items[0].title, "First post");
        // Raw text survives; normalization is the dedup/render layers' call.
        assert!(items[0].description.contains("Some\n"));
    }

    #[test]
    fn test_image_fallback_and_normalization() {
        // No img selector configured: first img descendant wins, URLs
        // resolved against the source URL.
        let items = extract(PAGE, &config(".post", "h2", "", ""), now()).unwrap();
        assert_eq!(items[0].img, "http://site.com/a.png");
        assert_eq!(items[1].img, "http://cdn.com/b.png");
    }

    #[test]
    fn test_no_title_selector_uses_element_text() {
        let markup = r#"<div class="post"><b>Bold</b> and plain</div>"#;
        let items = extract(markup, &config(".post", "", "", ""), now()).unwrap();
        assert_eq!(items[0].title, "Bold and plain");
    }

    #[test]
    fn test_noise_fragment_discarded() {
        let markup = r#"<div class="post"></div><div class="post"><h2>Real</h2></div>"#;
        let items = extract(markup, &config(".post", "h2", "", ""), now()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Real");
    }

    #[test]
    fn test_image_only_fragment_gets_placeholder_title() {
        let markup = r#"<div class="post"><img src="/solo.png"></div>"#;
        let items = extract(markup, &config(".post", "h2", "", ""), now()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Image: http://site.com/solo.png");
        assert_eq!(items[0].img, "http://site.com/solo.png");
    }

    #[test]
    fn test_newest_first_reverses_batch() {
        let mut cfg = config(".post", "h2", "", "");
        cfg.newest_first = true;
        let items = extract(PAGE, &cfg, now()).unwrap();
        assert_eq!(items[0].title, "Second post");
        assert_eq!(items[1].title, "First post");
    }

    #[test]
    fn test_default_container_is_body() {
        let markup = "<html><body><h1>Only heading</h1></body></html>";
        let items = extract(markup, &config("", "h1", "", ""), now()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Only heading");
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let result = extract(PAGE, &config("][", "", "", ""), now());
        assert!(matches!(result, Err(ExtractError::Selector { .. })));
    }

    #[test]
    fn test_data_url_image_treated_as_absent() {
        let markup = r#"<div class="post"><img src="data:image/png;base64,AA"></div>"#;
        let items = extract(markup, &config(".post", "h2", "", ""), now()).unwrap();
        // Rejected data URL leaves neither title nor image: noise.
        assert!(items.is_empty());
    }
}
