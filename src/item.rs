//! Loosely-structured feed entries as they come out of the parser.

use feed_rs::model::{Entry, FeedType};

/// One feed entry before filtering. Every field may be absent, so the
/// extraction functions over it never have to fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    /// Pre-parsed publication date, RFC 3339
    pub iso_date: Option<String>,
    /// Raw publish date string, RFC 2822 or RFC 3339
    pub pub_date: Option<String>,
    pub content: Option<String>,
    /// RSS `content:encoded` body. Only scanned for images, never for keywords.
    pub encoded_content: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    /// Plain-text rendition of the content, when the source provides one
    pub content_snippet: Option<String>,
    pub enclosure_url: Option<String>,
    pub itunes_image: Option<String>,
    pub media_content_url: Option<String>,
}

impl RawItem {
    pub fn from_entry(entry: &Entry, feed_type: &FeedType) -> Self {
        let body = entry.content.as_ref().and_then(|c| c.body.clone());
        let (content, encoded_content) = match feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => (None, body),
            _ => (body, None),
        };

        let description = entry
            .media
            .iter()
            .find_map(|m| m.description.as_ref())
            .map(|d| d.content.clone());

        let itunes_image = entry
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|t| t.image.uri.trim())
            .find(|uri| !uri.is_empty())
            .map(String::from);

        Self {
            title: entry.title.as_ref().map(|t| t.content.clone()),
            link: select_link(entry),
            guid: non_empty(&entry.id),
            iso_date: entry.published.map(|d| d.to_rfc3339()),
            pub_date: entry.updated.map(|d| d.to_rfc2822()),
            content,
            encoded_content,
            description,
            summary: entry.summary.as_ref().map(|s| s.content.clone()),
            content_snippet: None,
            enclosure_url: select_enclosure(entry),
            itunes_image,
            media_content_url: select_media_content(entry),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn is_image_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Prefer the alternate (or rel-less) link, then any non-empty link.
fn select_link(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| {
            let rel = l.rel.as_deref().unwrap_or("");
            !l.href.trim().is_empty() && (rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| entry.links.iter().find(|l| !l.href.trim().is_empty()))
        .map(|l| l.href.trim().to_string())
}

/// An image enclosure: either an Atom `rel="enclosure"` link with an image
/// type, or an RSS `<enclosure>` which the parser files under media content.
fn select_enclosure(entry: &Entry) -> Option<String> {
    let from_links = entry.links.iter().find(|l| {
        l.rel
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("enclosure"))
            && l.media_type.as_deref().map_or(true, is_image_type)
    });
    if let Some(link) = from_links {
        return non_empty(&link.href);
    }

    entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| {
            c.content_type
                .as_ref()
                .is_some_and(|t| is_image_type(&t.to_string()))
        })
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
}

/// First `media:content` URL that is not declared as something other than an image.
fn select_media_content(entry: &Entry) -> Option<String> {
    entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| {
            c.content_type
                .as_ref()
                .map_or(true, |t| is_image_type(&t.to_string()))
        })
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
}
