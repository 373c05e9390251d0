//! Downstream record delivery.
//!
//! Posts the stored object's URL and the submitted value to the
//! database-backed API. A single attempt is made; failures are classified so
//! the route layer can choose a status code.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Downstream delivery failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The endpoint answered with a non-2xx status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The endpoint could not be reached.
    #[error("{0}")]
    Connection(String),

    /// The request did not complete in time.
    #[error("{0}")]
    Timeout(String),

    /// Any other transport or decoding failure.
    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            NotifyError::Timeout(message)
        } else if err.is_connect() {
            NotifyError::Connection(message)
        } else if let Some(status) = err.status() {
            NotifyError::Status { status, message }
        } else {
            NotifyError::Request(message)
        }
    }
}

/// Render an error followed by each of its sources, `": "`-separated.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message in the outer one.
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Record sent downstream: `{"url": ..., "<value_field>": <value>}`.
#[derive(Debug, Clone)]
pub struct RecordPayload<'a> {
    pub url: &'a str,
    pub value_field: &'a str,
    pub value: i64,
}

impl Serialize for RecordPayload<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("url", self.url)?;
        map.serialize_entry(self.value_field, &self.value)?;
        map.end()
    }
}

/// HTTP client for the downstream API.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    /// Create a new notifier.
    ///
    /// Without a `timeout`, requests wait as long as the client library allows.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            client: builder.build().unwrap_or_default(),
        }
    }

    /// Post `payload` to `endpoint` and return the JSON response body.
    pub async fn notify(
        &self,
        endpoint: &str,
        payload: &RecordPayload<'_>,
    ) -> Result<Value, NotifyError> {
        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        let status = response.status();
        let body: Value = response.json().await?;

        debug!(endpoint = %endpoint, status = status.as_u16(), "record delivered downstream");
        Ok(body)
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish()
    }
}
