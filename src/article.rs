use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FeedSource;
use crate::image::extract_image;
use crate::item::RawItem;
use crate::keywords::KeywordSet;
use crate::text::{build_excerpt, searchable_text};

pub const UNTITLED: &str = "(Untitled)";

/// One normalised entry that passed the keyword filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// ISO-8601, or null when the entry has no usable date
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl ArticleRecord {
    /// Build a record from a raw entry, or `None` if no keyword matches.
    pub fn from_raw(
        item: &RawItem,
        feed: &FeedSource,
        keywords: &KeywordSet,
        excerpt_length: usize,
    ) -> Option<Self> {
        let text = searchable_text(item);
        if !keywords.matches(&text) {
            return None;
        }

        let title = item
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        let link = [&item.link, &item.guid]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            title,
            link,
            date: extract_date(item).map(format_iso),
            source: feed.source.clone(),
            tags: keywords.tags(&text),
            excerpt: build_excerpt(item, excerpt_length),
            image: extract_image(item),
        })
    }

    /// Sort key: milliseconds since the epoch, with missing or unparseable
    /// dates counted as the epoch itself.
    pub fn timestamp_millis(&self) -> i64 {
        self.date
            .as_deref()
            .and_then(parse_date)
            .map(|d| d.timestamp_millis())
            .unwrap_or(0)
    }

    /// Text the catalog filter searches.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.source,
            self.excerpt,
            self.tags.join(" ")
        )
    }
}

/// The persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub items: Vec<ArticleRecord>,
}

impl Snapshot {
    pub fn new(generated_at: DateTime<Utc>, items: Vec<ArticleRecord>) -> Self {
        Self {
            generated_at: Some(format_iso(generated_at)),
            items,
        }
    }
}

/// `2024-12-09T12:00:00.000Z`
pub fn format_iso(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Pre-parsed date first, then the raw publish date. Never fails.
pub fn extract_date(item: &RawItem) -> Option<DateTime<Utc>> {
    item.iso_date
        .as_deref()
        .and_then(parse_date)
        .or_else(|| item.pub_date.as_deref().and_then(parse_date))
}
