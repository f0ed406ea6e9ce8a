//! Checkout route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::checkout::{CheckoutService, PendingCheckout};
use crate::state::AppState;

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/checkout", post(start))
        .route("/api/checkout/success", get(success))
        .route("/api/checkout/cancel", get(cancel))
}

/// Checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: String,
}

/// Provider redirect query.
#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    pub order_id: i64,
}

/// Place an order from the cart and open a payment session.
///
/// # Errors
///
/// Returns 409 for an empty cart or insufficient stock and 502 if the
/// payment provider fails.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn start(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<PendingCheckout>)> {
    let pending = CheckoutService::new(state.pool(), state.payment())
        .start(user.id, &body.shipping_address)
        .await?;
    Ok((StatusCode::CREATED, Json(pending)))
}

/// Payment succeeded on the provider's page.
///
/// # Errors
///
/// Returns 404 for someone else's order and 409 if the provider has not
/// confirmed payment.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn success(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ReturnQuery>,
) -> Result<Json<Order>> {
    let order = CheckoutService::new(state.pool(), state.payment())
        .confirm(user.id, OrderId::new(query.order_id))
        .await?;
    Ok(Json(order))
}

/// Payment abandoned on the provider's page.
///
/// # Errors
///
/// Returns 404 for someone else's order and 409 if it is no longer pending.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ReturnQuery>,
) -> Result<Json<Order>> {
    let order = CheckoutService::new(state.pool(), state.payment())
        .abandon(user.id, OrderId::new(query.order_id))
        .await?;
    Ok(Json(order))
}
