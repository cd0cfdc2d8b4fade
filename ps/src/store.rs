//! Core PathStore implementation

use eyre::{Context, Result, bail};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{ANONYMOUS_USER, PATHS_DIR, UNTITLED};

/// Unique identifier for a stored learning path
pub type PathId = String;

const DATA_FILE: &str = "complete_data.json";
const FLOWCHART_FILE: &str = "flowchart.mmd";
const LOCK_FILE: &str = ".lock";

/// Metadata written alongside every stored path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetadata {
    /// Unique path id (UUIDv7, sorts by creation time)
    pub path_id: PathId,
    /// Creation timestamp (RFC 3339, UTC)
    pub created_at: String,
    /// Owning user
    pub user_id: String,
    /// Title copied from the learning path
    pub title: String,
}

/// The complete stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPath {
    pub metadata: PathMetadata,
    pub learning_path: serde_json::Value,
    pub mermaid_code: Option<String>,
}

/// What a caller gets back from a successful store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDetails {
    pub path_id: PathId,
    pub storage_location: String,
    pub created_at: String,
}

/// Exclusive lock on the store root, released on drop
struct StoreLock {
    file: fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// The main path store
pub struct PathStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl PathStore {
    /// Open or create a path store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(base_path.join(PATHS_DIR)).context("Failed to create store directory")?;
        debug!(?base_path, "Opened path store");
        Ok(Self { base_path })
    }

    fn lock(&self) -> Result<StoreLock> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.base_path.join(LOCK_FILE))
            .context("Failed to open store lock")?;
        file.lock_exclusive().context("Failed to lock store")?;
        Ok(StoreLock { file })
    }

    /// Persist a learning path and its flowchart
    ///
    /// The flowchart file is only written when `mermaid_code` is non-empty.
    pub fn store(&self, learning_path: &serde_json::Value, mermaid_code: &str, user_id: Option<&str>) -> Result<PathDetails> {
        let has_data = match learning_path {
            serde_json::Value::Null => false,
            serde_json::Value::Object(map) => !map.is_empty(),
            _ => true,
        };
        if !has_data {
            bail!("No learning path data provided");
        }

        let user_id = user_id.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(ANONYMOUS_USER);
        validate_user_id(user_id)?;

        let path_id = Uuid::now_v7().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let title = learning_path
            .get("title")
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        let stored = StoredPath {
            metadata: PathMetadata {
                path_id: path_id.clone(),
                created_at: created_at.clone(),
                user_id: user_id.to_string(),
                title,
            },
            learning_path: learning_path.clone(),
            mermaid_code: Some(mermaid_code.to_string()).filter(|m| !m.is_empty()),
        };

        let _lock = self.lock()?;
        let dir = self.base_path.join(PATHS_DIR).join(user_id).join(&path_id);
        fs::create_dir_all(&dir).context(format!("Failed to create {}", dir.display()))?;

        let body = serde_json::to_string_pretty(&stored)?;
        fs::write(dir.join(DATA_FILE), body).context("Failed to write learning path data")?;

        if !mermaid_code.is_empty() {
            fs::write(dir.join(FLOWCHART_FILE), mermaid_code).context("Failed to write flowchart")?;
        }

        info!(%path_id, %user_id, "Stored learning path");
        Ok(PathDetails {
            path_id,
            storage_location: format!("{}/", dir.display()),
            created_at,
        })
    }

    /// Load a stored path by id
    pub fn get(&self, path_id: &str) -> Result<StoredPath> {
        let dir = self.find(path_id)?;
        let content = fs::read_to_string(dir.join(DATA_FILE)).context(format!("Path data missing: {}", path_id))?;
        let stored: StoredPath = serde_json::from_str(&content).context("Failed to parse stored path")?;
        Ok(stored)
    }

    /// Load just the flowchart for a stored path
    pub fn flowchart(&self, path_id: &str) -> Result<String> {
        let dir = self.find(path_id)?;
        fs::read_to_string(dir.join(FLOWCHART_FILE)).context(format!("No flowchart stored for: {}", path_id))
    }

    /// List stored paths, newest first, optionally for one user
    pub fn list(&self, user_id: Option<&str>) -> Result<Vec<PathMetadata>> {
        let root = self.base_path.join(PATHS_DIR);
        let users: Vec<PathBuf> = match user_id {
            Some(user) => {
                validate_user_id(user)?;
                vec![root.join(user)]
            }
            None => fs::read_dir(&root)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
        };

        let mut paths = Vec::new();
        for user_dir in users {
            if !user_dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&user_dir)? {
                let data_path = entry?.path().join(DATA_FILE);
                if !data_path.exists() {
                    continue;
                }
                match fs::read_to_string(&data_path)
                    .map_err(eyre::Report::from)
                    .and_then(|c| serde_json::from_str::<StoredPath>(&c).map_err(eyre::Report::from))
                {
                    Ok(stored) => paths.push(stored.metadata),
                    Err(e) => warn!(path = %data_path.display(), error = %e, "Skipping unreadable stored path"),
                }
            }
        }

        paths.sort_by(|a, b| b.path_id.cmp(&a.path_id));
        Ok(paths)
    }

    /// Delete a stored path and all its files
    pub fn delete(&self, path_id: &str) -> Result<()> {
        let _lock = self.lock()?;
        let dir = self.find(path_id)?;
        fs::remove_dir_all(&dir)?;
        info!(path_id, "Deleted learning path");
        Ok(())
    }

    fn find(&self, path_id: &str) -> Result<PathBuf> {
        Uuid::parse_str(path_id).map_err(|_| eyre::eyre!("Invalid path id: {}", path_id))?;

        let root = self.base_path.join(PATHS_DIR);
        for entry in fs::read_dir(&root)? {
            let candidate = entry?.path().join(path_id);
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }
        Err(eyre::eyre!("Learning path not found: {}", path_id))
    }
}

/// User ids become directory names, so keep them to one plain path segment
fn validate_user_id(user_id: &str) -> Result<()> {
    let ok = !user_id.is_empty()
        && user_id != "."
        && user_id != ".."
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
    if !ok {
        bail!("Invalid user id: {:?}", user_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_path() -> serde_json::Value {
        json!({
            "title": "Rust Fundamentals",
            "overview": "Ownership and borrowing",
            "total_duration": "4 weeks",
            "topics": []
        })
    }

    #[test]
    fn test_store_writes_layout() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let details = store.store(&sample_path(), "graph TD\n    start", Some("42")).unwrap();

        let dir = temp.path().join(PATHS_DIR).join("42").join(&details.path_id);
        assert!(dir.join(DATA_FILE).exists());
        assert!(dir.join(FLOWCHART_FILE).exists());
        assert!(details.storage_location.ends_with('/'));
        assert!(chrono::DateTime::parse_from_rfc3339(&details.created_at).is_ok());
    }

    #[test]
    fn test_get_round_trips_metadata() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let details = store.store(&sample_path(), "graph TD", None).unwrap();
        let stored = store.get(&details.path_id).unwrap();

        assert_eq!(stored.metadata.user_id, ANONYMOUS_USER);
        assert_eq!(stored.metadata.title, "Rust Fundamentals");
        assert_eq!(stored.learning_path, sample_path());
        assert_eq!(store.flowchart(&details.path_id).unwrap(), "graph TD");
    }

    #[test]
    fn test_empty_flowchart_not_written() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let details = store.store(&sample_path(), "", Some("u1")).unwrap();
        let stored = store.get(&details.path_id).unwrap();

        assert!(stored.mermaid_code.is_none());
        assert!(store.flowchart(&details.path_id).is_err());
    }

    #[test]
    fn test_rejects_missing_learning_path() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let err = store.store(&serde_json::Value::Null, "graph TD", None).unwrap_err();
        assert!(err.to_string().contains("No learning path data provided"));
        assert!(store.store(&json!({}), "graph TD", None).is_err());
    }

    #[test]
    fn test_rejects_hostile_user_id() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        assert!(store.store(&sample_path(), "", Some("../escape")).is_err());
        assert!(store.store(&sample_path(), "", Some("..")).is_err());
        assert!(store.store(&sample_path(), "", Some("a/b")).is_err());
    }

    #[test]
    fn test_untitled_default() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let details = store.store(&json!({"topics": []}), "", None).unwrap();
        assert_eq!(store.get(&details.path_id).unwrap().metadata.title, UNTITLED);
    }

    #[test]
    fn test_list_and_delete() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        let first = store.store(&sample_path(), "", Some("alice")).unwrap();
        let second = store.store(&sample_path(), "", Some("bob")).unwrap();

        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].path_id, second.path_id);

        let alice = store.list(Some("alice")).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].path_id, first.path_id);

        store.delete(&first.path_id).unwrap();
        assert!(store.get(&first.path_id).is_err());
        assert_eq!(store.list(None).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_path_id() {
        let temp = TempDir::new().unwrap();
        let store = PathStore::open(temp.path()).unwrap();

        assert!(store.get("../../etc").is_err());
        assert!(store.get(&Uuid::now_v7().to_string()).is_err());
    }
}
