//! Remote object store access.
//!
//! The synchronizer only ever needs two operations: query the stored
//! content hash of a key, and upload a file with its hash attached as
//! object metadata. [`RemoteStore`] is the seam; [`S3RemoteStore`] is the
//! production implementation over the AWS SDK, wrapped so the caller stays
//! fully synchronous.

use std::future::Future;
use std::path::Path;

use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::error::{SyncError, SyncResult};

/// Object metadata key carrying the content hash.
pub const HASH_METADATA_KEY: &str = "sha256";

/// Remote object store operations the synchronizer depends on.
pub trait RemoteStore {
    /// Query the stored content hash of `key`.
    ///
    /// Returns `None` when the object does not exist, and also when it
    /// exists without hash metadata: every object this system writes
    /// carries the metadata, so its absence marks state that must be
    /// written again.
    ///
    /// # Errors
    ///
    /// Any failure other than not-found is an error; the caller treats it
    /// as fatal for the run.
    fn head(&self, key: &str) -> SyncResult<Option<String>>;

    /// Upload a file under `key`, attaching `content_hash` as object
    /// metadata so future runs can compare without downloading content.
    fn upload(&self, key: &str, file: &Path, content_hash: &str) -> SyncResult<()>;
}

/// S3-compatible remote store.
#[derive(Debug, Clone)]
pub struct S3RemoteStore {
    bucket: String,
    endpoint_url: Option<String>,
    region: Option<String>,
}

impl S3RemoteStore {
    /// Create a store for the given bucket, using the default endpoint
    /// and credential chain.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint_url: None,
            region: None,
        }
    }

    /// Use a custom endpoint URL (self-hosted S3-compatible storage).
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Use an explicit region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// The bucket this store targets.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Run a future to completion on a current-thread runtime.
    ///
    /// The synchronizer is sequential and blocking; the SDK's async
    /// surface stays contained here.
    fn run_async<T>(&self, key: &str, fut: impl Future<Output = SyncResult<T>>) -> SyncResult<T> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SyncError::Remote {
                key: key.to_string(),
                reason: format!("failed to create async runtime: {}", e),
            })?;
        runtime.block_on(fut)
    }

    async fn build_client(
        endpoint_url: Option<String>,
        region: Option<String>,
    ) -> aws_sdk_s3::Client {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;
        aws_sdk_s3::Client::new(&config)
    }
}

impl RemoteStore for S3RemoteStore {
    fn head(&self, key: &str) -> SyncResult<Option<String>> {
        let bucket = self.bucket.clone();
        let endpoint = self.endpoint_url.clone();
        let region = self.region.clone();
        let key_owned = key.to_string();

        self.run_async(key, async move {
            let client = Self::build_client(endpoint, region).await;

            match client
                .head_object()
                .bucket(&bucket)
                .key(&key_owned)
                .send()
                .await
            {
                Ok(output) => Ok(output
                    .metadata()
                    .and_then(|m| m.get(HASH_METADATA_KEY))
                    .cloned()),
                Err(err) => {
                    let not_found = err
                        .as_service_error()
                        .map(|e| e.is_not_found())
                        .unwrap_or(false);
                    if not_found {
                        Ok(None)
                    } else {
                        Err(SyncError::Remote {
                            key: key_owned,
                            reason: format!("{}", DisplayErrorContext(&err)),
                        })
                    }
                }
            }
        })
    }

    fn upload(&self, key: &str, file: &Path, content_hash: &str) -> SyncResult<()> {
        let bucket = self.bucket.clone();
        let endpoint = self.endpoint_url.clone();
        let region = self.region.clone();
        let key_owned = key.to_string();
        let path = file.to_path_buf();
        let hash = content_hash.to_string();

        self.run_async(key, async move {
            let client = Self::build_client(endpoint, region).await;

            let body = ByteStream::from_path(&path)
                .await
                .map_err(|e| SyncError::UploadFailed {
                    key: key_owned.clone(),
                    reason: format!("failed to open {}: {}", path.display(), e),
                })?;

            client
                .put_object()
                .bucket(&bucket)
                .key(&key_owned)
                .metadata(HASH_METADATA_KEY, hash.as_str())
                .body(body)
                .send()
                .await
                .map_err(|e| SyncError::UploadFailed {
                    key: key_owned.clone(),
                    reason: format!("{}", DisplayErrorContext(&e)),
                })?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_configuration() {
        let store = S3RemoteStore::new("rustup")
            .with_endpoint_url("https://s3.internal.example")
            .with_region("eu-central-1");

        assert_eq!(store.bucket(), "rustup");
        assert_eq!(
            store.endpoint_url.as_deref(),
            Some("https://s3.internal.example")
        );
        assert_eq!(store.region.as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn test_defaults_use_sdk_chain() {
        let store = S3RemoteStore::new("rustup");
        assert!(store.endpoint_url.is_none());
        assert!(store.region.is_none());
    }
}
