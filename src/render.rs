//! Read-side transform of stored feed state into an RSS 2.0 document.
//!
//! The emitted layout is the external artifact feed consumers depend on:
//! channel identity fields XML-escaped, item title/description CDATA-wrapped,
//! items in stored (oldest-first) order. Extracted fragments carry no
//! permalink of their own, so every item links to the feed's canonical URL,
//! and an item's image is packed into the single `description` field as an
//! `<img>` tag for client compatibility rather than an enclosure element.

use crate::store::Feed;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Wraps text in a CDATA section, splitting any embedded `]]>` terminator
/// so the output stays well-formed.
fn cdata(s: &str) -> String {
    format!("<![CDATA[{}]]>", s.replace("]]>", "]]]]><![CDATA[>"))
}

/// Renders a feed as an RSS 2.0 document. Pure and total over any
/// well-formed [`Feed`].
pub fn render_rss(feed: &Feed) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\">\n<channel>\n");
    out.push_str(&format!("  <title>{}</title>\n", xml_escape(&feed.title)));
    out.push_str(&format!("  <link>{}</link>\n", xml_escape(&feed.link)));
    out.push_str(&format!(
        "  <description>{}</description>\n",
        xml_escape(&feed.description)
    ));

    for item in &feed.items {
        let img_tag = if item.img.is_empty() {
            String::new()
        } else {
            format!("<img src=\"{}\" /> ", item.img)
        };
        out.push_str("  <item>\n");
        out.push_str(&format!("    <title>{}</title>\n", cdata(&item.title)));
        out.push_str(&format!("    <link>{}</link>\n", xml_escape(&feed.link)));
        out.push_str(&format!("    <pubDate>{}</pubDate>\n", item.pub_date));
        out.push_str(&format!(
            "    <description>{}</description>\n",
            cdata(&format!("{img_tag}{}", item.description))
        ));
        out.push_str("  </item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    out
}
