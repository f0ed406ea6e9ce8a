//! Store settings route handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use marketstall_core::{AdminOperation, SettingError, SettingKey};

use crate::db::SettingsRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(index))
        .route("/api/settings/{key}", put(update))
}

/// A stored setting after an update.
#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: SettingKey,
    pub value: Value,
}

fn setting_error(err: SettingError) -> AppError {
    match err {
        SettingError::UnknownKey(key) => AppError::NotFound(format!("setting {key}")),
        SettingError::InvalidValue { .. } => AppError::BadRequest(err.to_string()),
    }
}

/// Every setting, defaults filled in.
#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn index(
    State(state): State<AppState>,
    staff: RequireStaff,
) -> Result<Json<BTreeMap<SettingKey, Value>>> {
    staff.authorize(&state, AdminOperation::ViewSettings)?;
    Ok(Json(SettingsRepository::new(state.pool()).all().await?))
}

/// Replace one setting's value.
///
/// # Errors
///
/// Returns 404 for an unknown key and 400 for a value of the wrong shape.
#[instrument(skip(state, staff, value), fields(user_id = %staff.staff.id))]
pub async fn update(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<SettingResponse>> {
    staff.authorize(&state, AdminOperation::EditSettings)?;

    let key = key.parse::<SettingKey>().map_err(setting_error)?;
    key.validate(&value).map_err(setting_error)?;

    SettingsRepository::new(state.pool()).put(key, &value).await?;
    tracing::info!(setting = %key, "Setting updated");

    Ok(Json(SettingResponse { key, value }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_setting_errors_map_to_status() {
        let unknown = "theme".parse::<SettingKey>().unwrap_err();
        assert_eq!(
            setting_error(unknown).into_response().status(),
            StatusCode::NOT_FOUND
        );

        let invalid = SettingKey::LowStockThreshold
            .validate(&json!(-3))
            .unwrap_err();
        assert_eq!(
            setting_error(invalid).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
