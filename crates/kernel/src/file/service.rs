//! Upload orchestration.
//!
//! Sniffs the uploaded bytes, rejects unsupported types, and stores accepted
//! images under a freshly generated key.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::sniff::detect_mime_type;
use super::storage::{ObjectStore, StorageError};

/// Supported MIME types and the extension stored objects receive.
pub const SUPPORTED_FILE_TYPES: &[(&str, &str)] = &[("image/png", "png"), ("image/jpeg", "jpg")];

/// Upload failures.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(
        "Unsupported file type: {mime_type}. Supported types are {}",
        supported_types_display()
    )]
    UnsupportedType { mime_type: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A successfully stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub mime_type: String,
    pub size: usize,
}

/// Upload service bound to one object store.
pub struct UploadService {
    storage: Arc<dyn ObjectStore>,
}

impl UploadService {
    /// Create a new upload service.
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self { storage }
    }

    /// Store `data` under `folder`.
    ///
    /// Nothing is written unless the sniffed type is supported.
    pub async fn upload(&self, data: &[u8], folder: &str) -> Result<StoredObject, UploadError> {
        let mime_type = detect_mime_type(data);
        let Some(extension) = extension_for(&mime_type) else {
            return Err(UploadError::UnsupportedType { mime_type });
        };

        let key = object_key(folder, Uuid::new_v4(), extension);
        self.storage.put(&key, data).await?;
        let url = self.storage.public_url(&key);

        debug!(
            key = %key,
            mime_type = %mime_type,
            size = data.len(),
            scheme = self.storage.scheme(),
            "object stored"
        );

        Ok(StoredObject {
            key,
            url,
            mime_type,
            size: data.len(),
        })
    }
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("scheme", &self.storage.scheme())
            .finish()
    }
}

/// Extension for a supported MIME type.
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    SUPPORTED_FILE_TYPES
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, ext)| *ext)
}

/// Build `{folder}/{id}.{ext}`.
fn object_key(folder: &str, id: Uuid, extension: &str) -> String {
    format!("{}/{}.{}", folder.trim_end_matches('/'), id, extension)
}

/// Render the supported set as `{'image/png': 'png', 'image/jpeg': 'jpg'}`.
fn supported_types_display() -> String {
    let entries: Vec<String> = SUPPORTED_FILE_TYPES
        .iter()
        .map(|(mime, ext)| format!("'{mime}': '{ext}'"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
