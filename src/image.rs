//! Best-effort lead image for an article.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::item::RawItem;

fn img_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).expect("valid regex")
    })
}

/// Enclosure, podcast image, media content, then the first `<img>` in the HTML
/// (content, RSS encoded body, description, summary).
pub fn extract_image(item: &RawItem) -> Option<String> {
    let candidate = [
        &item.enclosure_url,
        &item.itunes_image,
        &item.media_content_url,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .map(str::trim)
    .find(|url| !url.is_empty())
    .map(String::from)
    .or_else(|| first_img_src(item.content.as_deref()))
    .or_else(|| first_img_src(item.encoded_content.as_deref()))
    .or_else(|| first_img_src(item.description.as_deref()))
    .or_else(|| first_img_src(item.summary.as_deref()))?;

    Some(resolve(&candidate, item.link.as_deref()))
}

pub fn first_img_src(html: Option<&str>) -> Option<String> {
    let html = html?;
    img_src_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|src| !src.is_empty())
}

/// Resolve `raw` against the origin of `base`. Anything that can't be
/// resolved comes back unchanged, except protocol-relative URLs which
/// default to https.
pub fn resolve(raw: &str, base: Option<&str>) -> String {
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }

    let base = base.and_then(|b| Url::parse(b).ok());

    if let Some(rest) = raw.strip_prefix("//") {
        let scheme = base
            .as_ref()
            .map(|b| b.scheme())
            .filter(|s| *s == "http" || *s == "https")
            .unwrap_or("https");
        return format!("{}://{}", scheme, rest);
    }

    let origin = base.and_then(|b| Url::parse(&b.origin().ascii_serialization()).ok());
    match origin.and_then(|o| o.join(raw).ok()) {
        Some(url) => url.to_string(),
        None => raw.to_string(),
    }
}
