//! Account administration route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::{AdminOperation, Role, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::StaffUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(index))
        .route("/api/users/{id}", delete(destroy))
        .route("/api/users/{id}/role", patch(update_role))
}

/// Role change request.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

/// Refuse actions an administrator may not take on their own account.
fn reject_self(staff: &RequireStaff, target: UserId, action: &str) -> Result<()> {
    if staff.staff.id == target {
        return Err(AppError::Conflict(format!("you cannot {action} your own account")));
    }
    Ok(())
}

#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn index(
    State(state): State<AppState>,
    staff: RequireStaff,
) -> Result<Json<Vec<StaffUser>>> {
    staff.authorize(&state, AdminOperation::ViewUsers)?;
    Ok(Json(UserRepository::new(state.pool()).list().await?))
}

/// Assign a role. Takes effect on the target's next request.
#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn update_role(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<UserId>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<StaffUser>> {
    staff.authorize(&state, AdminOperation::ManageUsers)?;
    reject_self(&staff, id, "change the role of")?;

    let user = UserRepository::new(state.pool())
        .set_role(id, body.role)
        .await?;
    tracing::info!(target_user_id = %id, role = %user.role, "Role changed");

    Ok(Json(user))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn destroy(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    staff.authorize(&state, AdminOperation::ManageUsers)?;
    reject_self(&staff, id, "delete")?;

    UserRepository::new(state.pool()).delete(id).await?;
    tracing::info!(target_user_id = %id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketstall_core::Email;

    use super::*;
    use crate::models::CurrentStaff;

    fn admin(id: i64) -> RequireStaff {
        RequireStaff {
            staff: CurrentStaff {
                id: UserId::new(id),
                email: Email::parse("admin@example.com").unwrap(),
                name: "Admin".to_string(),
            },
            role: Role::Administrator,
        }
    }

    #[test]
    fn test_reject_self() {
        assert!(reject_self(&admin(1), UserId::new(2), "delete").is_ok());
        assert!(matches!(
            reject_self(&admin(1), UserId::new(1), "delete"),
            Err(AppError::Conflict(msg)) if msg == "you cannot delete your own account"
        ));
    }
}
