//! Local filesystem snapshot store.
//!
//! Used for development and single-host deployments. Production runs
//! usually point at [`super::S3SnapshotStore`].

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Post;
use crate::storage::{SnapshotStore, decode_snapshot, encode_snapshot};

/// Snapshot kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling of the target with `.tmp` appended, never equal to the target.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self) -> Result<Vec<Post>> {
        match self
            .read_bytes()
            .await
            .map_err(|e| AppError::storage(format!("read {}: {e}", self.path.display())))?
        {
            Some(bytes) => decode_snapshot(&bytes),
            None => {
                log::info!("No snapshot at {}, starting empty", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, posts: &[Post]) -> Result<()> {
        let bytes = encode_snapshot(posts)?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::storage(format!("write {}: {e}", self.path.display())))?;
        log::info!("Wrote {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}
