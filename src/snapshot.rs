use std::path::Path;

use tokio::fs;

use crate::article::Snapshot;
use crate::error::{PersistError, SnapshotLoadError};

/// Write the snapshot next to its final path, then rename it into place so a
/// reader never sees a partial file.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .await
        .map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;

    let data = serde_json::to_vec_pretty(snapshot)?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    if let Err(source) = fs::write(&tmp_path, &data).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(PersistError::Write {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(PersistError::Rename {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

pub async fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotLoadError> {
    let bytes = fs::read(path)
        .await
        .map_err(|source| SnapshotLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleRecord;

    fn record(link: &str) -> ArticleRecord {
        ArticleRecord {
            title: "Fairy Ring Walks".to_string(),
            link: link.to_string(),
            date: Some("2024-06-01T00:00:00.000Z".to_string()),
            source: "Test".to_string(),
            tags: vec!["fairy".to_string()],
            excerpt: "Walks".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/articles.json");
        let snapshot = Snapshot {
            generated_at: Some("2025-01-01T00:00:00.000Z".to_string()),
            items: vec![record("https://example.com/a")],
        };

        write_snapshot(&path, &snapshot).await.unwrap();

        let loaded = read_snapshot(&path).await.unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_write_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");

        let first = Snapshot {
            generated_at: Some("2025-01-01T00:00:00.000Z".to_string()),
            items: vec![record("https://example.com/a")],
        };
        let second = Snapshot {
            generated_at: Some("2025-01-02T00:00:00.000Z".to_string()),
            items: vec![],
        };

        write_snapshot(&path, &first).await.unwrap();
        write_snapshot(&path, &second).await.unwrap();

        assert_eq!(read_snapshot(&path).await.unwrap(), second);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = write_snapshot(&blocker.join("articles.json"), &Snapshot {
            generated_at: None,
            items: vec![],
        })
        .await;

        assert!(matches!(result, Err(PersistError::CreateDir { .. })));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let result = read_snapshot(Path::new("/nonexistent/articles.json")).await;
        assert!(matches!(result, Err(SnapshotLoadError::Read { .. })));
    }

    #[tokio::test]
    async fn test_read_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = read_snapshot(&path).await;
        assert!(matches!(result, Err(SnapshotLoadError::Malformed(_))));
    }
}
