//! Staff authentication and authorization.
//!
//! The session only proves who is logged in. What they may do is decided
//! per request: [`RequireStaff`] re-reads the account's role from the
//! database, and handlers ask the access gate before touching anything.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use marketstall_core::{AdminOperation, Role};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{CurrentStaff, session_keys};
use crate::state::AppState;

/// Extractor for a logged-in staff member and their current role.
///
/// Rejects with 401 if nobody is logged in or the account was deleted, and
/// with 403 if the account is no longer a staff role.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     State(state): State<AppState>,
///     staff: RequireStaff,
/// ) -> Result<Json<Vec<Product>>> {
///     staff.authorize(&state, AdminOperation::ViewProducts)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireStaff {
    pub staff: CurrentStaff,
    pub role: Role,
}

impl RequireStaff {
    /// Ask the access gate whether this staff member may perform `operation`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if the role lacks the operation.
    pub fn authorize(&self, state: &AppState, operation: AdminOperation) -> Result<(), AppError> {
        state.gate().authorize(self.role, operation).map_err(|denied| {
            tracing::info!(
                user_id = %self.staff.id,
                role = %self.role,
                operation = %operation,
                "Operation denied"
            );
            AppError::from(denied)
        })
    }
}

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or(AppError::Unauthorized)?;

        let Some(role) = UserRepository::new(state.pool())
            .current_role(staff.id)
            .await?
        else {
            // Account deleted since login.
            let _ = session.flush().await;
            return Err(AppError::Unauthorized);
        };

        if !role.is_staff() {
            return Err(AppError::Forbidden);
        }

        Ok(Self { staff, role })
    }
}

/// Store the staff member in the session, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be updated.
pub async fn set_current_staff(
    session: &Session,
    staff: &CurrentStaff,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_STAFF, staff).await
}

/// Destroy the session.
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_current_staff(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
