//! In-memory catalog of a loaded snapshot, with free-text filtering.

use std::path::PathBuf;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use tracing::{error, info};

use crate::article::{ArticleRecord, Snapshot};
use crate::error::SnapshotLoadError;
use crate::snapshot::read_snapshot;

pub const LOAD_ERROR_MESSAGE: &str =
    "There was a problem loading the latest articles. Please try again later.";
pub const NO_MATCHES_MESSAGE: &str = "No articles match your current filters.";

/// Where a snapshot is loaded from.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    Url(String),
    File(PathBuf),
}

impl SnapshotSource {
    pub async fn load(&self, client: &Client) -> Result<Snapshot, SnapshotLoadError> {
        match self {
            SnapshotSource::Url(url) => {
                let response = client
                    .get(url)
                    .header(CACHE_CONTROL, "no-store")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SnapshotLoadError::Status(status));
                }
                let bytes = response.bytes().await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            SnapshotSource::File(path) => read_snapshot(path).await,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<ArticleRecord>,
    filtered: Vec<ArticleRecord>,
    generated_at: Option<String>,
}

impl Catalog {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            filtered: snapshot.items.clone(),
            items: snapshot.items,
            generated_at: snapshot.generated_at,
        }
    }

    pub fn items(&self) -> &[ArticleRecord] {
        &self.items
    }

    pub fn filtered(&self) -> &[ArticleRecord] {
        &self.filtered
    }

    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    /// Recompute `filtered` from scratch. A blank query shows everything.
    pub fn filter(&mut self, query: &str) -> &[ArticleRecord] {
        let query = query.trim().to_lowercase();
        self.filtered = if query.is_empty() {
            self.items.clone()
        } else {
            self.items
                .iter()
                .filter(|item| item.haystack().to_lowercase().contains(&query))
                .cloned()
                .collect()
        };
        &self.filtered
    }

    /// "12 articles", or "3 of 12 articles" while a filter hides some.
    pub fn count_label(&self) -> String {
        let total = self.items.len();
        let visible = self.filtered.len();
        if total > 0 && visible != total {
            format!("{} of {} articles", visible, total)
        } else {
            format!("{} articles", visible)
        }
    }
}

/// One card in the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

impl From<&ArticleRecord> for Card {
    fn from(record: &ArticleRecord) -> Self {
        let or = |value: &str, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            title: or(&record.title, crate::article::UNTITLED),
            link: or(&record.link, "#"),
            source: or(&record.source, "Unknown source"),
            date: record.date.clone(),
            excerpt: record.excerpt.clone(),
            tags: record.tags.clone(),
            image: record.image.clone(),
        }
    }
}

/// What the viewer currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Loading,
    Failed(&'static str),
    Articles {
        cards: Vec<Card>,
        empty_message: Option<&'static str>,
        count: String,
        generated: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Loading,
    Ready(Catalog),
    Failed,
}

/// A page session: load once, then filter as often as the user types.
#[derive(Debug, Default)]
pub struct Viewer {
    state: ViewState,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Load the snapshot. Failure is never fatal; it moves the viewer to
    /// the failed state and the cause is only logged.
    pub async fn load(&mut self, source: &SnapshotSource, client: &Client) -> Rendered {
        self.state = match source.load(client).await {
            Ok(snapshot) => {
                info!("Loaded {} articles", snapshot.items.len());
                ViewState::Ready(Catalog::from_snapshot(snapshot))
            }
            Err(e) => {
                error!("Failed to load snapshot from {:?}: {}", source, e);
                ViewState::Failed
            }
        };
        self.render()
    }

    /// Apply `query` and re-render. Ignored unless a catalog is loaded.
    pub fn filter(&mut self, query: &str) -> Rendered {
        if let ViewState::Ready(catalog) = &mut self.state {
            catalog.filter(query);
        }
        self.render()
    }

    pub fn render(&self) -> Rendered {
        match &self.state {
            ViewState::Loading => Rendered::Loading,
            ViewState::Failed => Rendered::Failed(LOAD_ERROR_MESSAGE),
            ViewState::Ready(catalog) => {
                let cards: Vec<Card> = catalog.filtered().iter().map(Card::from).collect();
                Rendered::Articles {
                    empty_message: cards.is_empty().then_some(NO_MATCHES_MESSAGE),
                    cards,
                    count: catalog.count_label(),
                    generated: catalog
                        .generated_at()
                        .map(|ts| format!("Updated {}", ts))
                        .unwrap_or_default(),
                }
            }
        }
    }
}
