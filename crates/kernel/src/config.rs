//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default request body cap for uploads (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind (default: 0.0.0.0).
    pub host: String,

    /// HTTP server port (default: 8000).
    pub port: u16,

    /// Downstream endpoint receiving solved records.
    pub solved_url: String,

    /// Downstream endpoint receiving unsolved records.
    pub unsolved_url: String,

    /// Key prefix for solved uploads.
    pub solved_folder: String,

    /// Key prefix for unsolved uploads.
    pub unsolved_folder: String,

    /// S3 storage settings.
    pub s3: S3Config,

    /// Timeout for downstream requests. When None, the HTTP client default
    /// (no timeout) applies.
    pub downstream_timeout: Option<Duration>,

    /// Maximum accepted request body size in bytes (default: 10 MB).
    pub max_upload_bytes: usize,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

/// S3 bucket and credential settings.
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Static access key. When either half is missing, the default AWS
    /// credential chain is used instead.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible services (e.g. MinIO).
    pub endpoint_url: Option<String>,
    /// Overrides the `https://{bucket}.s3.{region}.amazonaws.com` URL base.
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// Static credentials, if both halves are configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field("endpoint_url", &self.endpoint_url)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let solved_url =
            env::var("SOLVED_URL").context("SOLVED_URL environment variable is required")?;

        let unsolved_url =
            env::var("UNSOLVED_URL").context("UNSOLVED_URL environment variable is required")?;

        let solved_folder = env::var("SOLVED_FOLDER_NAME")
            .context("SOLVED_FOLDER_NAME environment variable is required")?;

        let unsolved_folder = env::var("UNSOLVED_FOLDER_NAME")
            .context("UNSOLVED_FOLDER_NAME environment variable is required")?;

        let bucket =
            env::var("BUCKET_NAME").context("BUCKET_NAME environment variable is required")?;

        let region =
            env::var("AWS_REGION").context("AWS_REGION environment variable is required")?;

        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID");
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY");
        let endpoint_url = non_empty_var("S3_ENDPOINT_URL");
        let public_base_url = non_empty_var("S3_PUBLIC_BASE_URL");

        let downstream_timeout = match non_empty_var("DOWNSTREAM_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.parse()
                    .context("DOWNSTREAM_TIMEOUT_SECS must be a valid u64")?,
            )),
            None => None,
        };

        let max_upload_bytes = match non_empty_var("MAX_UPLOAD_BYTES") {
            Some(v) => v.parse().context("MAX_UPLOAD_BYTES must be a valid usize")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            host,
            port,
            solved_url,
            unsolved_url,
            solved_folder,
            unsolved_folder,
            s3: S3Config {
                bucket,
                region,
                access_key_id,
                secret_access_key,
                endpoint_url,
                public_base_url,
            },
            downstream_timeout,
            max_upload_bytes,
            cors_allowed_origins,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
