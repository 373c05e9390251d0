//! Object storage backends.
//!
//! Provides the storage trait and the S3 implementation used in production.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::debug;

use crate::config::S3Config;

/// Object storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No credentials could be resolved for the request.
    #[error("AWS credentials not available")]
    Credentials,

    /// Transport, permission or service failure.
    #[error("{0}")]
    Failed(String),
}

/// Object storage backend trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`.
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Public URL for `key`. Derived from configuration, never fetched.
    fn public_url(&self, key: &str) -> String;

    /// Storage scheme (e.g. "s3").
    fn scheme(&self) -> &'static str;
}

/// S3 object storage.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    /// Base URL for public access when not served from the bucket endpoint.
    public_base_url: Option<String>,
}

impl S3ObjectStore {
    /// Create a new S3 object store.
    ///
    /// Static credentials from configuration take precedence; otherwise the
    /// default AWS credential chain (env vars, config file, instance profile)
    /// is used. Credential resolution happens lazily on the first write.
    pub async fn new(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some((access_key_id, secret_access_key)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "solveshot-config",
            ));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint_url.is_some() {
            // S3-compatible services rarely support virtual-hosted buckets.
            builder = builder.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        debug!(bucket = %self.bucket, key = %key, size = data.len(), "object written to S3");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => s3_public_url(&self.bucket, &self.region, key),
        }
    }

    fn scheme(&self) -> &'static str {
        "s3"
    }
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

/// Virtual-hosted style URL of an object in an AWS bucket.
pub fn s3_public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}

/// Map an SDK failure onto the storage taxonomy.
///
/// Credential resolution fails before dispatch, so only non-service errors
/// can be credential errors. Service responses (access denied, bad
/// signature) count as ordinary failures.
fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(_) => StorageError::Failed(message),
        _ if mentions_credentials(&message) => StorageError::Credentials,
        _ => StorageError::Failed(message),
    }
}

fn mentions_credentials(message: &str) -> bool {
    message.to_ascii_lowercase().contains("credential")
}
