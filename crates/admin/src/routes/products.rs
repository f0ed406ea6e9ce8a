//! Product, variant and stock route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use marketstall_core::{AdminOperation, ProductId, StockAdjustment, VariantId};

use crate::db::{ProductRepository, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{LowStockVariant, Product, ProductDraft, Variant, VariantDraft, VariantUpdate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(index).post(create))
        .route(
            "/api/products/{id}",
            get(show).put(update).delete(destroy),
        )
        .route(
            "/api/products/{id}/variants",
            get(variants).post(create_variant),
        )
        .route(
            "/api/variants/{id}",
            put(update_variant).delete(destroy_variant),
        )
        .route("/api/variants/{id}/stock", put(adjust_stock))
        .route("/api/stock/low", get(low_stock))
}

/// A product with its variants.
#[derive(Debug, Serialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
}

/// Every product, active or not.
#[instrument(skip_all, fields(user_id = %staff.staff.id))]
pub async fn index(State(state): State<AppState>, staff: RequireStaff) -> Result<Json<Vec<Product>>> {
    staff.authorize(&state, AdminOperation::ViewProducts)?;
    Ok(Json(ProductRepository::new(state.pool()).list().await?))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn show(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithVariants>> {
    staff.authorize(&state, AdminOperation::ViewProducts)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let variants = repo.variants(id).await?;

    Ok(Json(ProductWithVariants { product, variants }))
}

#[instrument(skip(state, staff, draft), fields(user_id = %staff.staff.id))]
pub async fn create(
    State(state): State<AppState>,
    staff: RequireStaff,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    staff.authorize(&state, AdminOperation::EditProducts)?;
    draft.validate().map_err(AppError::BadRequest)?;

    let product = ProductRepository::new(state.pool()).create(&draft).await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, staff, draft), fields(user_id = %staff.staff.id))]
pub async fn update(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ProductId>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    staff.authorize(&state, AdminOperation::EditProducts)?;
    draft.validate().map_err(AppError::BadRequest)?;

    Ok(Json(ProductRepository::new(state.pool()).update(id, &draft).await?))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn destroy(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    staff.authorize(&state, AdminOperation::EditProducts)?;

    ProductRepository::new(state.pool()).delete(id).await?;
    tracing::info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn variants(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Variant>>> {
    staff.authorize(&state, AdminOperation::ViewProducts)?;

    let repo = ProductRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    Ok(Json(repo.variants(id).await?))
}

#[instrument(skip(state, staff, draft), fields(user_id = %staff.staff.id))]
pub async fn create_variant(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<ProductId>,
    Json(draft): Json<VariantDraft>,
) -> Result<(StatusCode, Json<Variant>)> {
    staff.authorize(&state, AdminOperation::EditProducts)?;
    draft.validate().map_err(AppError::BadRequest)?;

    let variant = ProductRepository::new(state.pool())
        .create_variant(id, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

#[instrument(skip(state, staff, update), fields(user_id = %staff.staff.id))]
pub async fn update_variant(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<VariantId>,
    Json(update): Json<VariantUpdate>,
) -> Result<Json<Variant>> {
    staff.authorize(&state, AdminOperation::EditProducts)?;
    update.validate().map_err(AppError::BadRequest)?;

    Ok(Json(
        ProductRepository::new(state.pool())
            .update_variant(id, &update)
            .await?,
    ))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn destroy_variant(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<VariantId>,
) -> Result<StatusCode> {
    staff.authorize(&state, AdminOperation::EditProducts)?;
    ProductRepository::new(state.pool()).delete_variant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set a variant's stock.
///
/// # Errors
///
/// Returns 400 for a negative count and 409 when `expected_previous` no
/// longer matches.
#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn adjust_stock(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<VariantId>,
    Json(adjustment): Json<StockAdjustment>,
) -> Result<Json<Variant>> {
    staff.authorize(&state, AdminOperation::EditStock)?;
    adjustment
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let variant = ProductRepository::new(state.pool())
        .adjust_stock(id, adjustment)
        .await?;
    tracing::info!(variant_id = %id, stock = variant.stock, "Stock adjusted");

    Ok(Json(variant))
}

/// Optional override of the stored low-stock threshold.
#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i32>,
}

/// Variants at or below the low-stock threshold.
#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn low_stock(
    State(state): State<AppState>,
    staff: RequireStaff,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<LowStockVariant>>> {
    staff.authorize(&state, AdminOperation::ViewStock)?;

    let threshold = match query.threshold {
        Some(t) if t < 0 => {
            return Err(AppError::BadRequest("threshold must not be negative".to_string()));
        }
        Some(t) => t,
        None => SettingsRepository::new(state.pool()).low_stock_threshold().await?,
    };

    Ok(Json(
        ProductRepository::new(state.pool()).low_stock(threshold).await?,
    ))
}
