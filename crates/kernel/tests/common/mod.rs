#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the REAL router and handlers. Only the two external
//! collaborators are replaced: S3 by an in-memory [`MemoryStore`], and the
//! downstream API by a `wiremock` server.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use solveshot_kernel::config::{DEFAULT_MAX_UPLOAD_BYTES, S3Config};
use solveshot_kernel::file::{ObjectStore, StorageError};
use solveshot_kernel::{AppState, Config, routes};
use solveshot_test_utils::MultipartForm;

pub const SOLVED_FOLDER: &str = "solved";
pub const UNSOLVED_FOLDER: &str = "unsolved";

/// How the in-memory store answers `put`.
#[derive(Debug, Clone)]
pub enum StoreBehavior {
    Accept,
    MissingCredentials,
    Fail(String),
}

/// In-memory object store recording every accepted key.
#[derive(Debug)]
pub struct MemoryStore {
    behavior: StoreBehavior,
    objects: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryStore {
    pub fn new(behavior: StoreBehavior) -> Self {
        Self {
            behavior,
            objects: Mutex::new(Vec::new()),
        }
    }

    /// Keys written so far, in order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        match &self.behavior {
            StoreBehavior::Accept => {
                self.objects
                    .lock()
                    .unwrap()
                    .push((key.to_string(), data.to_vec()));
                Ok(())
            }
            StoreBehavior::MissingCredentials => Err(StorageError::Credentials),
            StoreBehavior::Fail(message) => Err(StorageError::Failed(message.clone())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://test-bucket.s3.us-east-1.amazonaws.com/{key}")
    }

    fn scheme(&self) -> &'static str {
        "memory"
    }
}

/// Build a configuration pointing both downstream endpoints at `base_url`.
pub fn test_config(base_url: &str, downstream_timeout: Option<Duration>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        solved_url: format!("{base_url}/solved"),
        unsolved_url: format!("{base_url}/unsolved"),
        solved_folder: SOLVED_FOLDER.to_string(),
        unsolved_folder: UNSOLVED_FOLDER.to_string(),
        s3: S3Config {
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            public_base_url: None,
        },
        downstream_timeout,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// Test application wrapper using the REAL routes and state.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new(config: &Config, behavior: StoreBehavior) -> Self {
        let store = Arc::new(MemoryStore::new(behavior));
        let state = AppState::with_storage(config, store.clone());
        let router = routes::app(state, config.max_upload_bytes);
        Self { router, store }
    }

    /// Send a request through the router.
    pub async fn request(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// POST a multipart form to `path`.
    pub async fn post_form(&self, path: &str, form: MultipartForm) -> Response {
        let content_type = form.content_type();
        let req = Request::post(path)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(form.finish()))
            .unwrap();
        self.request(req).await
    }
}

/// Address nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
