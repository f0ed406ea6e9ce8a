//! Order administration.

use sqlx::{PgConnection, PgPool};

use marketstall_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderDetail, OrderLine};

const ORDER_SELECT: &str = r"
    SELECT o.id, o.user_id, u.email AS customer_email, o.status, o.total,
           o.shipping_address, o.payment_session_id, o.created_at, o.updated_at
    FROM shop.customer_order o
    JOIN shop.user_account u ON u.id = o.user_id
";

/// Repository for orders as seen by staff.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders newest first, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{ORDER_SELECT} WHERE ($1::TEXT IS NULL OR o.status = $1) \
             ORDER BY o.created_at DESC, o.id DESC"
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// An order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let order = sqlx::query_as::<_, Order>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(order) = order else {
            return Ok(None);
        };
        let lines = order_lines(&mut conn, order.id).await?;

        Ok(Some(OrderDetail { order, lines }))
    }

    /// Move an order to `next`.
    ///
    /// Setting the status an order already has is a no-op. Cancelling an
    /// order that still holds stock puts its lines back on the shelf in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist and
    /// `RepositoryError::Conflict` if the lifecycle forbids the change.
    pub async fn set_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<OrderDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: OrderStatus = sqlx::query_scalar(
            "SELECT status FROM shop.customer_order WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if current != next {
            current
                .transition(next)
                .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

            if next == OrderStatus::Cancelled && current.holds_stock() {
                restock(&mut tx, id).await?;
            }

            sqlx::query(
                "UPDATE shop.customer_order SET status = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(next)
            .execute(&mut *tx)
            .await?;

            tracing::info!(order_id = %id, from = %current, to = %next, "Order status changed");
        }

        let order = sqlx::query_as::<_, Order>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let lines = order_lines(&mut tx, id).await?;

        tx.commit().await?;
        Ok(OrderDetail { order, lines })
    }
}

async fn order_lines(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderLine>, RepositoryError> {
    let lines = sqlx::query_as::<_, OrderLine>(
        r"
        SELECT variant_id, product_name, sku, unit_price, quantity
        FROM shop.order_line
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    Ok(lines)
}

/// Return an order's quantities to variants that still exist.
async fn restock(conn: &mut PgConnection, order_id: OrderId) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE shop.variant v
        SET stock = v.stock + l.quantity, updated_at = NOW()
        FROM shop.order_line l
        WHERE l.order_id = $1 AND l.variant_id = v.id
        ",
    )
    .bind(order_id)
    .execute(conn)
    .await?;

    Ok(())
}
