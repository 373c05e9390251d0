//! Outbound service clients.

pub mod downstream;

pub use downstream::{Notifier, NotifyError, RecordPayload};
