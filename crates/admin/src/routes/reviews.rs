//! Review moderation route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use tracing::instrument;

use marketstall_core::{AdminOperation, ReviewId};

use crate::db::ReviewRepository;
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::models::ReviewEntry;
use crate::state::AppState;

/// Number of reviews shown in the moderation queue.
const RECENT_LIMIT: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", get(index))
        .route("/api/reviews/{id}", delete(destroy))
}

/// The most recent reviews across the store.
#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn index(
    State(state): State<AppState>,
    staff: RequireStaff,
) -> Result<Json<Vec<ReviewEntry>>> {
    staff.authorize(&state, AdminOperation::ModerateReviews)?;
    Ok(Json(
        ReviewRepository::new(state.pool()).recent(RECENT_LIMIT).await?,
    ))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn destroy(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ReviewId>,
) -> Result<StatusCode> {
    staff.authorize(&state, AdminOperation::ModerateReviews)?;
    ReviewRepository::new(state.pool()).delete(id).await?;
    tracing::info!(review_id = %id, "Review removed");
    Ok(StatusCode::NO_CONTENT)
}
