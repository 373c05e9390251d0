//! Solveshot Kernel Library
//!
//! Image upload service: sniffs uploaded images, stores them in S3 and
//! records them with a downstream API. The server entry point is the
//! `solveshot` binary; the library is exposed for integration testing.

pub mod config;
pub mod error;
pub mod file;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::{AppState, Category, UploadTarget};
