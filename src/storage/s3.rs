//! S3 snapshot store.
//!
//! Works against AWS or any S3-compatible object store reachable through a
//! custom endpoint. Credentials follow the standard AWS provider chain.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::models::Post;
use crate::storage::{SnapshotStore, decode_snapshot, encode_snapshot};

/// Stored snapshots must never be served from a cache.
const CACHE_CONTROL: &str = "no-cache, no-store, max-age=0";

/// Snapshot kept as one object in a bucket.
#[derive(Clone)]
pub struct S3SnapshotStore {
    client: Client,
    bucket: String,
    key: String,
}

impl S3SnapshotStore {
    /// Create a new S3 store instance.
    pub fn new(client: Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create an S3 store from the ambient AWS configuration.
    pub async fn from_env(
        bucket: &str,
        key: &str,
        region: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self::new(Client::from_conf(builder.build()), bucket, key))
    }

    fn location(&self) -> String {
        s3_uri(&self.bucket, &self.key)
    }
}

#[async_trait]
impl SnapshotStore for S3SnapshotStore {
    async fn load(&self) -> Result<Vec<Post>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::storage(format!("read {}: {e}", self.location())))?
                    .into_bytes();
                decode_snapshot(&bytes)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No snapshot at {}, starting empty", self.location());
                    Ok(Vec::new())
                } else {
                    Err(AppError::storage(format!(
                        "get {}: {service_err}",
                        self.location()
                    )))
                }
            }
        }
    }

    async fn save(&self, posts: &[Post]) -> Result<()> {
        let bytes = encode_snapshot(posts)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(ByteStream::from(bytes))
            .content_type("application/json")
            .cache_control(CACHE_CONTROL)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!("put {}: {}", self.location(), e.into_service_error()))
            })?;

        log::info!("Wrote {} posts to {}", posts.len(), self.location());
        Ok(())
    }
}

fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_uri() {
        assert_eq!(s3_uri("news", "snapshot.json"), "s3://news/snapshot.json");
        assert_eq!(s3_uri("news", "/state/posts.json"), "s3://news/state/posts.json");
    }
}
