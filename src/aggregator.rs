use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::article::{ArticleRecord, Snapshot};
use crate::config::{Config, FeedSource};
use crate::error::{FetchError, PersistError};
use crate::fetcher::FeedClient;
use crate::keywords::KeywordSet;
use crate::snapshot::write_snapshot;

/// Outcome of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub items_written: usize,
    pub output_path: PathBuf,
}

/// Articles gathered from every feed, already merged.
#[derive(Debug, Clone)]
pub struct Gathered {
    pub articles: Vec<ArticleRecord>,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
}

pub struct Aggregator<C> {
    config: Config,
    keywords: KeywordSet,
    client: C,
}

impl<C: FeedClient> Aggregator<C> {
    pub fn new(config: Config, client: C) -> Self {
        let keywords = KeywordSet::new(&config.keywords);
        Self {
            config,
            keywords,
            client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one feed and keep the entries that mention a keyword.
    pub async fn fetch_and_filter(
        &self,
        feed: &FeedSource,
    ) -> Result<Vec<ArticleRecord>, FetchError> {
        let raw = tokio::time::timeout(self.config.fetch_timeout(), self.client.fetch(feed))
            .await
            .map_err(|_| FetchError::Timeout(self.config.fetch_timeout_secs))??;

        let records: Vec<ArticleRecord> = raw
            .iter()
            .filter_map(|item| {
                ArticleRecord::from_raw(item, feed, &self.keywords, self.config.excerpt_length)
            })
            .collect();

        info!(
            "Kept {} of {} entries from '{}'",
            records.len(),
            raw.len(),
            feed.source
        );
        Ok(records)
    }

    /// Fetch every feed concurrently. A failing feed is logged and
    /// contributes nothing; the rest are merged in configuration order.
    pub async fn gather(&self) -> Gathered {
        info!("Fetching {} feeds", self.config.feeds.len());

        let results = join_all(
            self.config
                .feeds
                .iter()
                .map(|feed| async move { (feed, self.fetch_and_filter(feed).await) }),
        )
        .await;

        let mut batches = Vec::with_capacity(results.len());
        let mut feeds_failed = 0;
        for (feed, result) in results {
            match result {
                Ok(records) => batches.push(records),
                Err(e) => {
                    error!("Failed to fetch feed '{}' ({}): {}", feed.source, feed.url, e);
                    feeds_failed += 1;
                }
            }
        }

        let feeds_ok = batches.len();
        Gathered {
            articles: merge_articles(batches, self.config.max_items),
            feeds_ok,
            feeds_failed,
        }
    }

    /// Gather, then write the snapshot. Only a persist failure is an error.
    pub async fn run(&self) -> Result<RunSummary, PersistError> {
        let gathered = self.gather().await;
        if gathered.feeds_ok == 0 && !self.config.feeds.is_empty() {
            warn!("Every feed failed; writing an empty snapshot");
        }

        let snapshot = Snapshot::new(Utc::now(), gathered.articles);
        write_snapshot(&self.config.output_path, &snapshot).await?;

        info!(
            "Wrote {} articles to {}",
            snapshot.items.len(),
            self.config.output_path.display()
        );

        Ok(RunSummary {
            feeds_ok: gathered.feeds_ok,
            feeds_failed: gathered.feeds_failed,
            items_written: snapshot.items.len(),
            output_path: self.config.output_path.clone(),
        })
    }
}

/// Drop link-less records, keep the first record per link, sort newest
/// first (undated last) and keep at most `max_items`.
pub fn merge_articles(batches: Vec<Vec<ArticleRecord>>, max_items: usize) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<ArticleRecord> = batches
        .into_iter()
        .flatten()
        .filter(|record| !record.link.is_empty())
        .filter(|record| seen.insert(record.link.clone()))
        .collect();

    // Stable, so equal dates keep their feed order.
    merged.sort_by_key(|record| std::cmp::Reverse(record.timestamp_millis()));
    merged.truncate(max_items);
    merged
}
