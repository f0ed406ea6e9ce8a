//! Banner route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::{AdminOperation, Banner, BannerDraft, BannerId, PageType, resolve_for_page};

use crate::db::BannerRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/banners", get(index).post(create))
        .route("/api/banners/preview", get(preview))
        .route(
            "/api/banners/{id}",
            get(show).put(update).delete(destroy),
        )
}

#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn index(State(state): State<AppState>, staff: RequireStaff) -> Result<Json<Vec<Banner>>> {
    staff.authorize(&state, AdminOperation::ViewBanners)?;
    Ok(Json(BannerRepository::new(state.pool()).list().await?))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn show(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<BannerId>,
) -> Result<Json<Banner>> {
    staff.authorize(&state, AdminOperation::ViewBanners)?;
    BannerRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("banner {id}")))
}

#[instrument(skip(state, staff, draft), fields(user_id = %staff.staff.id))]
pub async fn create(
    State(state): State<AppState>,
    staff: RequireStaff,
    Json(draft): Json<BannerDraft>,
) -> Result<(StatusCode, Json<Banner>)> {
    staff.authorize(&state, AdminOperation::EditBanners)?;
    draft
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let banner = BannerRepository::new(state.pool()).create(&draft).await?;
    tracing::info!(banner_id = %banner.id, page_type = %banner.page_type, "Banner created");

    Ok((StatusCode::CREATED, Json(banner)))
}

#[instrument(skip(state, staff, draft), fields(user_id = %staff.staff.id))]
pub async fn update(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<BannerId>,
    Json(draft): Json<BannerDraft>,
) -> Result<Json<Banner>> {
    staff.authorize(&state, AdminOperation::EditBanners)?;
    draft
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(BannerRepository::new(state.pool()).update(id, &draft).await?))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn destroy(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<BannerId>,
) -> Result<StatusCode> {
    staff.authorize(&state, AdminOperation::EditBanners)?;
    BannerRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Page and date to preview.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub page_type: String,
    pub page_identifier: Option<String>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

impl PreviewQuery {
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown page type.
    pub fn page_type(&self) -> Result<PageType> {
        self.page_type
            .parse::<PageType>()
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }

    /// The identifier, with blank treated as absent.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.page_identifier
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// What a page would show on a given date.
///
/// Unlike the storefront, a failing store is reported as an error here.
#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn preview(
    State(state): State<AppState>,
    staff: RequireStaff,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Vec<Banner>>> {
    staff.authorize(&state, AdminOperation::ViewBanners)?;
    let page_type = query.page_type()?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let candidates = BannerRepository::new(state.pool())
        .for_page_type(page_type)
        .await?;

    Ok(Json(resolve_for_page(
        candidates,
        page_type,
        query.identifier(),
        date,
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_query_parsing() {
        let query: PreviewQuery = serde_json::from_str(
            r#"{"page_type": "category", "page_identifier": " ", "date": "2025-12-24"}"#,
        )
        .unwrap();
        assert_eq!(query.page_type().unwrap(), PageType::Category);
        assert_eq!(query.identifier(), None);
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2025, 12, 24));

        let query = PreviewQuery {
            page_type: "landing".to_string(),
            page_identifier: None,
            date: None,
        };
        assert!(matches!(query.page_type(), Err(AppError::BadRequest(_))));
    }
}
