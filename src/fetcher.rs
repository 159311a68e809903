use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::FeedSource;
use crate::error::FetchError;
use crate::item::RawItem;

const USER_AGENT: &str = "HedgerowDigest/1.0 (RSS Aggregator)";

/// Retrieves one feed and hands back its entries.
#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch(&self, feed: &FeedSource) -> Result<Vec<RawItem>, FetchError>;
}

pub struct HttpFeedClient {
    client: Client,
}

impl HttpFeedClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch(&self, feed: &FeedSource) -> Result<Vec<RawItem>, FetchError> {
        info!("Fetching feed: {} ({})", feed.source, feed.url);

        let response = self.client.get(&feed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: feed.url.clone(),
            });
        }

        let bytes = response.bytes().await?;
        let items = parse_feed(&bytes)?;

        debug!("Parsed {} entries from '{}'", items.len(), feed.source);
        Ok(items)
    }
}

/// Parse RSS, Atom or JSON Feed bytes into raw items.
///
/// Entries without an id keep an empty one rather than a generated UUID,
/// so an item with neither link nor guid ends up with no link at all.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawItem>, FetchError> {
    let parsed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(bytes)?;
    Ok(parsed
        .entries
        .iter()
        .map(|entry| RawItem::from_entry(entry, &parsed.feed_type))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_entries_in_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>Wild Food UK</title>
                    <link>https://www.wildfooduk.com</link>
                    <description>Foraging articles</description>
                    <item>
                        <title>Wild Garlic</title>
                        <link>https://www.wildfooduk.com/wild-garlic</link>
                    </item>
                    <item>
                        <title>Sea Beet</title>
                        <link>https://www.wildfooduk.com/sea-beet</link>
                    </item>
                </channel>
            </rss>
        "#;

        let items = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Wild Garlic"));
        assert_eq!(items[1].title.as_deref(), Some("Sea Beet"));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(HttpFeedClient::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_parse_feed_is_stable_for_id_less_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>Storytelling</title>
                    <link>https://stories.example.com</link>
                    <description>Tales</description>
                    <item>
                        <title>Fairy tales</title>
                        <description>folklore</description>
                    </item>
                </channel>
            </rss>
        "#;

        let first = parse_feed(xml.as_bytes()).unwrap();
        let second = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].guid, None);
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        let result = parse_feed(b"this is not a feed");
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<?xml version="1.0"?>
            <rss version="2.0">
                <channel>
                    <title>Empty</title>
                    <link>https://empty.example.com</link>
                    <description>Nothing yet</description>
                </channel>
            </rss>
        "#;

        assert!(parse_feed(xml.as_bytes()).unwrap().is_empty());
    }
}
