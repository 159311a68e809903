//! Plain-text helpers: tag stripping, whitespace collapse, excerpts.

use std::sync::OnceLock;

use regex::Regex;

use crate::item::RawItem;

const ELLIPSIS: char = '\u{2026}';

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Replace every HTML tag with a space, so adjacent words stay apart.
pub fn strip_tags(input: &str) -> String {
    tag_re().replace_all(input, " ").into_owned()
}

pub fn collapse_whitespace(input: &str) -> String {
    whitespace_re().replace_all(input, " ").trim().to_string()
}

/// Tag-stripped, whitespace-collapsed, lowercased text.
pub fn normalise(input: &str) -> String {
    collapse_whitespace(&strip_tags(input)).to_lowercase()
}

/// Everything keyword matching looks at, joined by spaces and normalised.
pub fn searchable_text(item: &RawItem) -> String {
    let joined = [
        &item.title,
        &item.description,
        &item.content,
        &item.summary,
        &item.content_snippet,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .filter(|field| !field.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    normalise(&joined)
}

/// Cut `text` to at most `limit` characters, ending with an ellipsis when cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let kept: String = text.chars().take(limit.saturating_sub(1)).collect();
    let mut out = kept.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Excerpt from the first non-empty of snippet, summary, content,
/// description, title.
pub fn build_excerpt(item: &RawItem, limit: usize) -> String {
    let raw = [
        &item.content_snippet,
        &item.summary,
        &item.content,
        &item.description,
        &item.title,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .find(|field| !field.is_empty())
    .unwrap_or("");

    truncate(&collapse_whitespace(&strip_tags(raw)), limit)
}
