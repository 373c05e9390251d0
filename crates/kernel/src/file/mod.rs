//! Image upload handling.
//!
//! Provides content sniffing, object storage, and upload orchestration.

pub mod service;
pub mod sniff;
pub mod storage;

pub use service::{SUPPORTED_FILE_TYPES, StoredObject, UploadError, UploadService};
pub use sniff::detect_mime_type;
pub use storage::{ObjectStore, S3ObjectStore, StorageError};
