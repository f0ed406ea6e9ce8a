//! Dashboard route handler.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use marketstall_core::AdminOperation;

use crate::db::dashboard;
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::models::DashboardSummary;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(show))
}

/// Order counts, revenue and low stock at a glance.
#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn show(
    State(state): State<AppState>,
    staff: RequireStaff,
) -> Result<Json<DashboardSummary>> {
    staff.authorize(&state, AdminOperation::ViewDashboard)?;
    Ok(Json(dashboard::summary(state.pool()).await?))
}
