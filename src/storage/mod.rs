//! Snapshot persistence.
//!
//! The snapshot is the full, append-only list of posts seen so far, stored
//! as one pretty-printed JSON array under a single key.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Post, StorageConfig};

// Re-export for convenience
pub use local::LocalSnapshotStore;
#[cfg(feature = "s3")]
pub use s3::S3SnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot. A snapshot that was never written loads as empty.
    async fn load(&self) -> Result<Vec<Post>>;

    /// Replace the whole snapshot.
    async fn save(&self, posts: &[Post]) -> Result<()>;
}

/// Serialize a snapshot the way it is stored.
pub fn encode_snapshot(posts: &[Post]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(posts)
        .map_err(|e| AppError::storage(format!("encode snapshot: {e}")))
}

/// Deserialize a stored snapshot. Corrupt data is an error, never "empty".
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Post>> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::storage(format!("decode snapshot: {e}")))
}

/// Build the store selected by the configuration.
pub async fn open(config: &StorageConfig) -> Result<Box<dyn SnapshotStore>> {
    match config {
        StorageConfig::Local { path } => Ok(Box::new(LocalSnapshotStore::new(path))),
        #[cfg(feature = "s3")]
        StorageConfig::S3 {
            bucket,
            key,
            region,
            endpoint,
        } => Ok(Box::new(
            S3SnapshotStore::from_env(bucket, key, region.as_deref(), endpoint.as_deref()).await?,
        )),
        #[cfg(not(feature = "s3"))]
        StorageConfig::S3 { .. } => Err(AppError::config(
            "S3 storage requested but the `s3` feature is disabled",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_corrupt_snapshot() {
        let err = decode_snapshot(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_encode_is_pretty_array() {
        let posts = vec![Post::new("A", "https://example.org/a")];
        let text = String::from_utf8(encode_snapshot(&posts).unwrap()).unwrap();
        assert!(text.starts_with("[\n"));
        assert_eq!(decode_snapshot(text.as_bytes()).unwrap(), posts);
    }
}
