//! Catalogue route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::ProductId;

use crate::db::ProductRepository;
use crate::db::products::{MAX_PER_PAGE, ProductFilter, ProductPage};
use crate::error::{AppError, Result};
use crate::models::{CategoryEntry, ProductDetail};
use crate::state::AppState;

/// Default page size.
const DEFAULT_PER_PAGE: u32 = 24;

/// Build the catalogue router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(index))
        .route("/api/products/{id}", get(show))
        .route("/api/categories", get(categories))
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ListQuery {
    /// Convert to a repository filter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a zero page or an oversized page.
    pub fn into_filter(self) -> Result<ProductFilter> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::BadRequest("page starts at 1".to_string()));
        }
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(AppError::BadRequest(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }

        Ok(ProductFilter {
            category: non_blank(self.category),
            subcategory: non_blank(self.subcategory),
            query: non_blank(self.q),
            page,
            per_page,
        })
    }
}

/// List active products.
///
/// # Errors
///
/// Returns 400 for bad paging and 500 if the database fails.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductPage>> {
    let filter = query.into_filter()?;
    let page = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(page))
}

/// Product detail with variants and rating summary.
///
/// # Errors
///
/// Returns 404 if the product is missing or inactive.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDetail>> {
    let id = ProductId::new(id);
    let products = ProductRepository::new(state.pool());

    let product = products
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let variants = products.variants(id).await?;
    let rating = products.rating_summary(id).await?;

    Ok(Json(ProductDetail {
        product,
        variants,
        rating,
    }))
}

/// Distinct category/subcategory pairs of active products.
///
/// # Errors
///
/// Returns 500 if the database fails.
#[instrument(skip_all)]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryEntry>>> {
    let categories = ProductRepository::new(state.pool()).categories().await?;
    Ok(Json(categories))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filter = ListQuery::default().into_filter().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, DEFAULT_PER_PAGE);
        assert!(filter.category.is_none());
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let filter = ListQuery {
            category: Some("  ".to_string()),
            q: Some(" linen ".to_string()),
            ..ListQuery::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter.category.is_none());
        assert_eq!(filter.query.as_deref(), Some("linen"));
    }

    #[test]
    fn test_bad_paging_is_rejected() {
        let zero_page = ListQuery {
            page: Some(0),
            ..ListQuery::default()
        };
        assert!(matches!(zero_page.into_filter(), Err(AppError::BadRequest(_))));

        let huge = ListQuery {
            per_page: Some(MAX_PER_PAGE + 1),
            ..ListQuery::default()
        };
        assert!(matches!(huge.into_filter(), Err(AppError::BadRequest(_))));
    }
}
