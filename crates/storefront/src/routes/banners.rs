//! Banner route handler.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::{Banner, PageType};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the banners router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/banners", get(index))
}

/// Page addressed by a banner lookup.
#[derive(Debug, Deserialize)]
pub struct BannerQuery {
    pub page_type: String,
    pub page_identifier: Option<String>,
}

impl BannerQuery {
    /// Parse the page type; a blank identifier means "no identifier".
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown page type.
    pub fn target(&self) -> Result<(PageType, Option<&str>)> {
        let page_type = self
            .page_type
            .parse::<PageType>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let identifier = self
            .page_identifier
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        Ok((page_type, identifier))
    }
}

/// Banners to show on a page today, in display order.
///
/// A failing banner store yields an empty list, never an error.
///
/// # Errors
///
/// Returns 400 for an unknown page type.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BannerQuery>,
) -> Result<Json<Vec<Banner>>> {
    let (page_type, identifier) = query.target()?;
    let today = Utc::now().date_naive();

    let banners = state.banners().for_page(page_type, identifier, today).await;
    Ok(Json(banners))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(page_type: &str, identifier: Option<&str>) -> BannerQuery {
        BannerQuery {
            page_type: page_type.to_string(),
            page_identifier: identifier.map(str::to_string),
        }
    }

    #[test]
    fn test_target_parsing() {
        let q = query("Category", Some("women"));
        assert_eq!(q.target().unwrap(), (PageType::Category, Some("women")));

        let q = query("home", Some("   "));
        assert_eq!(q.target().unwrap(), (PageType::Home, None));
    }

    #[test]
    fn test_unknown_page_type() {
        assert!(matches!(
            query("checkout", None).target(),
            Err(AppError::BadRequest(_))
        ));
    }
}
