//! Image upload route handler.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use marketstall_core::AdminOperation;

use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::services::uploads::{MAX_UPLOAD_BYTES, save_upload};
use crate::state::AppState;

/// Request body limit: base64 inflates by a third, plus room for JSON.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES / 3 * 4 + 64 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/uploads", post(create))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

/// Upload request.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub data_base64: String,
}

/// Where the stored file is served from.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
}

/// Store an image and return its public path.
///
/// # Errors
///
/// Returns 415 for a disallowed extension, 413 for a file over the limit and
/// 400 for malformed base64.
#[instrument(skip(state, staff, body), fields(user_id = %staff.staff.id, filename = %body.filename))]
pub async fn create(
    State(state): State<AppState>,
    staff: RequireStaff,
    Json(body): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    staff.authorize(&state, AdminOperation::UploadFiles)?;

    let path = save_upload(&state.config().upload_dir, &body.filename, &body.data_base64).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { path })))
}
