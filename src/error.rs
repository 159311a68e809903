use std::path::PathBuf;

use thiserror::Error;

/// One feed could not be retrieved or parsed. Contained at the feed boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// The snapshot could not be written. Fatal to a run.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move snapshot into place at {path}: {source}")]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The viewer could not obtain a usable snapshot.
#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0} when loading snapshot")]
    Status(reqwest::StatusCode),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}
