//! Application state shared across all handlers.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::file::{ObjectStore, S3ObjectStore, UploadService};
use crate::services::Notifier;

/// Upload category, selected by route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Solved,
    Unsolved,
}

/// Where an upload category is stored and reported.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    /// Key prefix inside the bucket.
    pub folder: String,
    /// Downstream endpoint receiving the record.
    pub endpoint: String,
    /// Form field carrying the value, echoed in the downstream payload.
    pub value_field: &'static str,
}

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Upload orchestration over the configured object store.
    uploads: UploadService,

    /// Downstream API client.
    notifier: Notifier,

    solved: UploadTarget,
    unsolved: UploadTarget,
}

impl AppState {
    /// Create application state backed by S3.
    pub async fn new(config: &Config) -> Self {
        let storage = S3ObjectStore::new(&config.s3).await;
        info!(
            bucket = %config.s3.bucket,
            region = %config.s3.region,
            static_credentials = config.s3.static_credentials().is_some(),
            "S3 storage configured"
        );

        Self::with_storage(config, Arc::new(storage))
    }

    /// Create application state over an arbitrary object store.
    pub fn with_storage(config: &Config, storage: Arc<dyn ObjectStore>) -> Self {
        let solved = UploadTarget {
            folder: config.solved_folder.clone(),
            endpoint: config.solved_url.clone(),
            value_field: "solvedValue",
        };
        let unsolved = UploadTarget {
            folder: config.unsolved_folder.clone(),
            endpoint: config.unsolved_url.clone(),
            value_field: "unsolvedValue",
        };

        Self {
            inner: Arc::new(AppStateInner {
                uploads: UploadService::new(storage),
                notifier: Notifier::new(config.downstream_timeout),
                solved,
                unsolved,
            }),
        }
    }

    /// Get the upload service.
    pub fn uploads(&self) -> &UploadService {
        &self.inner.uploads
    }

    /// Get the downstream notifier.
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Get the target for an upload category.
    pub fn target(&self, category: Category) -> &UploadTarget {
        match category {
            Category::Solved => &self.inner.solved,
            Category::Unsolved => &self.inner.unsolved,
        }
    }
}
