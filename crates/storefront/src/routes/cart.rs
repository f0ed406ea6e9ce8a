//! Cart route handlers. Every route requires a logged-in customer.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::VariantId;

use crate::db::cart::{LineChange, MAX_LINE_QUANTITY};
use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Cart;
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(show))
        .route("/api/cart/items", post(add))
        .route(
            "/api/cart/items/{variant_id}",
            patch(update).delete(remove),
        )
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub variant_id: i64,
    #[serde(default = "one")]
    pub quantity: i32,
}

const fn one() -> i32 {
    1
}

/// Quantity update request. Zero removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// Check a requested quantity against `min..=MAX_LINE_QUANTITY`.
fn check_quantity(quantity: i32, min: i32) -> Result<i32> {
    if (min..=MAX_LINE_QUANTITY).contains(&quantity) {
        Ok(quantity)
    } else {
        Err(AppError::BadRequest(format!(
            "quantity must be between {min} and {MAX_LINE_QUANTITY}"
        )))
    }
}

async fn load(state: &AppState, user_id: marketstall_core::UserId) -> Result<Json<Cart>> {
    let lines = CartRepository::new(state.pool()).lines(user_id).await?;
    Ok(Json(Cart::from_lines(lines)))
}

/// The customer's cart.
///
/// # Errors
///
/// Returns 500 if the database fails.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Result<Json<Cart>> {
    load(&state, user.id).await
}

/// Add a variant to the cart.
///
/// Stock is not reserved here; checkout re-checks it.
///
/// # Errors
///
/// Returns 400 for a bad quantity or a line that would exceed the limit,
/// and 404 for an unknown variant.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    let quantity = check_quantity(body.quantity, 1)?;
    let change = CartRepository::new(state.pool())
        .add(user.id, VariantId::new(body.variant_id), quantity)
        .await?;
    if change == LineChange::LimitReached {
        return Err(AppError::BadRequest(format!(
            "a cart line holds at most {MAX_LINE_QUANTITY} units"
        )));
    }
    load(&state, user.id).await
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns 400 for a bad quantity and 404 if the line does not exist.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(variant_id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Cart>> {
    let quantity = check_quantity(body.quantity, 0)?;
    CartRepository::new(state.pool())
        .set_quantity(user.id, VariantId::new(variant_id), quantity)
        .await?;
    load(&state, user.id).await
}

/// Remove a line.
///
/// # Errors
///
/// Returns 404 if the line does not exist.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(variant_id): Path<i64>,
) -> Result<Json<Cart>> {
    CartRepository::new(state.pool())
        .remove(user.id, VariantId::new(variant_id))
        .await?;
    load(&state, user.id).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(check_quantity(1, 1).unwrap(), 1);
        assert_eq!(check_quantity(0, 0).unwrap(), 0);
        assert_eq!(check_quantity(MAX_LINE_QUANTITY, 1).unwrap(), MAX_LINE_QUANTITY);
        assert!(check_quantity(0, 1).is_err());
        assert!(check_quantity(-3, 0).is_err());
        assert!(check_quantity(MAX_LINE_QUANTITY + 1, 1).is_err());
    }

    #[test]
    fn test_add_defaults_to_one() {
        let req: AddItemRequest = serde_json::from_str(r#"{"variant_id": 9}"#).unwrap();
        assert_eq!(req.quantity, 1);
    }
}
