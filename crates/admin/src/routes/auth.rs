//! Staff authentication route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marketstall_core::AdminOperation;

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireStaff, clear_current_staff, set_current_staff};
use crate::models::{CurrentStaff, StaffUser};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Build the auth router (mounted under `/api/auth`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The logged-in staff member and what they may do.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: StaffUser,
    pub permissions: Vec<AdminOperation>,
}

fn me_response(state: &AppState, user: StaffUser) -> MeResponse {
    let permissions = state.gate().permitted(user.role);
    MeResponse { user, permissions }
}

/// Staff password login.
///
/// # Errors
///
/// Returns 401 for a wrong email or password, or a customer account.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<MeResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    set_current_staff(&session, &CurrentStaff::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %user.role, "Staff logged in");

    Ok(Json(me_response(&state, user)))
}

/// Logout.
///
/// # Errors
///
/// Returns 500 if the session store fails.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_staff(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in staff member with their current permissions.
///
/// # Errors
///
/// Returns 401 if nobody is logged in.
#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn me(State(state): State<AppState>, staff: RequireStaff) -> Result<Json<MeResponse>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(staff.staff.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(me_response(&state, user)))
}
