//! File-backed key-value store.
//!
//! Each key lives in its own JSON file:
//!
//! ```text
//! <root>/
//! ├── borrowItems.json
//! ├── currentUser.json
//! └── ...
//! ```

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{KeyValueStore, StorageError};

/// Store writing one file per key beneath a root directory.
///
/// Writes go to a dot-prefixed temp file first and are then renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root)
                .map_err(|err| StorageError::directory_creation(&root, err))?;
        }
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.json.tmp", sanitize_key(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let temp_path = self.temp_path(key);
        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn sanitize_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "value".to_string()
    } else {
        result
    }
}
