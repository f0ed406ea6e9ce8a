//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::{AdminOperation, OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{Order, OrderDetail};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(index))
        .route("/api/orders/{id}", get(show))
        .route("/api/orders/{id}/status", patch(update_status))
}

/// `?status=` filter. An empty value means no filter.
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
}

impl OrderQuery {
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown status.
    pub fn status(&self) -> Result<Option<OrderStatus>> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<OrderStatus>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))
            })
            .transpose()
    }
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn index(
    State(state): State<AppState>,
    staff: RequireStaff,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<Order>>> {
    staff.authorize(&state, AdminOperation::ViewOrders)?;
    let status = query.status()?;
    Ok(Json(OrderRepository::new(state.pool()).list(status).await?))
}

#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn show(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    staff.authorize(&state, AdminOperation::ViewOrders)?;
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Move an order along its lifecycle.
///
/// # Errors
///
/// Returns 409 for a transition the lifecycle forbids, such as reviving a
/// cancelled order.
#[instrument(skip(state, staff), fields(user_id = %staff.staff.id))]
pub async fn update_status(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<OrderDetail>> {
    staff.authorize(&state, AdminOperation::EditOrders)?;
    Ok(Json(
        OrderRepository::new(state.pool())
            .set_status(id, body.status)
            .await?,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(status: Option<&str>) -> OrderQuery {
        OrderQuery {
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(query(None).status().unwrap(), None);
        assert_eq!(query(Some("")).status().unwrap(), None);
        assert_eq!(
            query(Some("shipped")).status().unwrap(),
            Some(OrderStatus::Shipped)
        );
        assert!(matches!(
            query(Some("lost")).status(),
            Err(AppError::BadRequest(_))
        ));
    }
}
