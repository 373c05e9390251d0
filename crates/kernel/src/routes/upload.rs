//! Image upload route handlers.
//!
//! `POST /upload` and `POST /unsolved/upload` share one handler; the route
//! attaches a [`Category`] that selects the folder, downstream endpoint and
//! value field.

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Multipart, State},
    routing::post,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::services::RecordPayload;
use crate::state::{AppState, Category};

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Create the upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload).layer(Extension(Category::Solved)))
        .route(
            "/unsolved/upload",
            post(upload).layer(Extension(Category::Unsolved)),
        )
}

/// Success envelope wrapping the downstream response body.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub data: Value,
}

/// Parsed upload form.
#[derive(Debug)]
struct UploadForm {
    data: Bytes,
    value: i64,
}

/// Upload an image and record it downstream.
///
/// Content-Type: multipart/form-data
///
/// Form fields:
/// - file: the image (PNG or JPEG, detected from content)
/// - solvedValue / unsolvedValue: integer, depending on the route
async fn upload(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let target = state.target(category);
    let form = read_form(&mut multipart, target.value_field).await?;

    let stored = state.uploads().upload(&form.data, &target.folder).await?;
    info!(
        category = ?category,
        key = %stored.key,
        mime_type = %stored.mime_type,
        size = stored.size,
        "image stored"
    );

    // The object stays in the bucket even if delivery below fails.
    let payload = RecordPayload {
        url: &stored.url,
        value_field: target.value_field,
        value: form.value,
    };
    let data = state.notifier().notify(&target.endpoint, &payload).await?;

    info!(category = ?category, url = %stored.url, "upload recorded downstream");

    Ok(Json(UploadResponse {
        status: "success",
        data,
    }))
}

/// Collect the file and the integer value field from the multipart body.
async fn read_form(multipart: &mut Multipart, value_field: &str) -> AppResult<UploadForm> {
    let mut data: Option<Bytes> = None;
    let mut value: Option<i64> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD {
            data = Some(field.bytes().await?);
        } else if name == value_field {
            let text = field.text().await?;
            let parsed = text.trim().parse::<i64>().map_err(|_| {
                AppError::InvalidForm(format!(
                    "field `{value_field}` must be an integer, got {text:?}"
                ))
            })?;
            value = Some(parsed);
        }
    }

    let Some(data) = data else {
        return Err(AppError::InvalidForm(format!("missing field `{FILE_FIELD}`")));
    };
    let Some(value) = value else {
        return Err(AppError::InvalidForm(format!("missing field `{value_field}`")));
    };

    Ok(UploadForm { data, value })
}
