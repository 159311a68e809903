use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Where the snapshot JSON is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Maximum number of articles kept in a snapshot
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Maximum excerpt length in characters, ellipsis included
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    /// Per-feed fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    pub feeds: Vec<FeedSource>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/articles.json")
}

fn default_max_items() -> usize {
    120
}

fn default_excerpt_length() -> usize {
    280
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

pub fn default_keywords() -> Vec<String> {
    [
        "folklore",
        "myth",
        "legend",
        "faerie",
        "fairy",
        "witch",
        "foraging",
        "wild food",
        "hedgerow",
        "mushroom",
        "fungi",
        "seaweed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    /// Display label written into every article from this feed
    pub source: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with default settings for the given feeds
    pub fn with_feeds(feeds: Vec<FeedSource>) -> Self {
        Self {
            output_path: default_output_path(),
            max_items: default_max_items(),
            excerpt_length: default_excerpt_length(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            keywords: default_keywords(),
            feeds,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.keywords.iter().any(|k| !k.trim().is_empty()),
            "keywords must contain at least one non-empty term"
        );
        anyhow::ensure!(self.max_items > 0, "max_items must be positive");
        anyhow::ensure!(
            self.excerpt_length > 1,
            "excerpt_length must be greater than 1"
        );
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        assert_eq!(default_max_items(), 120);
        assert_eq!(default_excerpt_length(), 280);
        assert_eq!(default_fetch_timeout_secs(), 30);
        assert_eq!(default_output_path(), PathBuf::from("data/articles.json"));
        assert_eq!(default_keywords().len(), 12);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
            output_path = "public/data/articles.json"
            max_items = 50
            keywords = ["folklore", "wild food"]

            [[feeds]]
            source = "Eatweeds (Foraging)"
            url = "https://www.eatweeds.co.uk/feed"

            [[feeds]]
            source = "The Past"
            url = "https://the-past.com/feed/"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(
            config.output_path,
            PathBuf::from("public/data/articles.json")
        );
        assert_eq!(config.max_items, 50);
        assert_eq!(config.keywords, vec!["folklore", "wild food"]);
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].source, "Eatweeds (Foraging)");
        assert_eq!(config.feeds[0].url, "https://www.eatweeds.co.uk/feed");
        assert_eq!(config.feeds[1].source, "The Past");
    }

    #[test]
    fn test_load_config_with_defaults() {
        let content = r#"
            [[feeds]]
            source = "Test Feed"
            url = "https://example.com/feed.xml"
        "#;

        let config = Config::from_str(content).unwrap();

        assert_eq!(config.max_items, 120);
        assert_eq!(config.excerpt_length, 280);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.keywords, default_keywords());
        assert_eq!(config.feeds.len(), 1);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/feeds.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let content = "this is not valid toml {{{";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_required_fields() {
        let content = r#"
            [[feeds]]
            source = "Test Feed"
            # Missing url field
        "#;

        let result = Config::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let content = r#"
            keywords = ["", "  "]
            feeds = []
        "#;

        let err = Config::from_str(content).unwrap_err();
        assert!(err.to_string().contains("keywords"));
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let content = r#"
            max_items = 0
            feeds = []
        "#;

        assert!(Config::from_str(content).is_err());
    }

    #[test]
    fn test_empty_feeds_list() {
        let content = "feeds = []";

        let config = Config::from_str(content).unwrap();
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn test_with_feeds_uses_defaults() {
        let config = Config::with_feeds(vec![FeedSource::new(
            "https://example.com/rss",
            "Example",
        )]);
        assert_eq!(config.max_items, 120);
        assert_eq!(config.feeds[0].source, "Example");
        assert!(config.validate().is_ok());
    }
}
