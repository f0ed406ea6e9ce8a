//! Order repository.
//!
//! Checkout, payment confirmation and cancellation are the only
//! multi-statement writes in the storefront; each runs in one transaction.

use sqlx::{PgConnection, PgPool};

use marketstall_core::{Money, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{CartLine, Order, OrderDetail, OrderLine};

const ORDER_COLUMNS: &str =
    "id, user_id, status, total, shipping_address, payment_session_id, created_at, updated_at";

/// Repository for customer orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// One of a user's orders with its lines. Other users' orders are `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };
        let lines = order_lines(&mut conn, order.id).await?;

        Ok(Some(OrderDetail { order, lines }))
    }

    /// Turn the user's cart into a pending order, reserving stock.
    ///
    /// Every line decrements its variant with a guarded update, so the shelf
    /// never goes negative even under concurrent checkouts. The cart itself
    /// is left untouched until payment succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart is empty or any line
    /// lacks stock; nothing is written in that case.
    pub async fn place(
        &self,
        user_id: UserId,
        shipping_address: &str,
        shipping_fee: Money,
    ) -> Result<OrderDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.variant_id, p.id AS product_id, p.name AS product_name, v.sku,
                   v.size, v.color, COALESCE(v.price_override, p.price) AS unit_price,
                   c.quantity, v.stock AS available
            FROM shop.cart_item c
            JOIN shop.variant v ON v.id = c.variant_id
            JOIN shop.product p ON p.id = v.product_id
            WHERE c.user_id = $1 AND p.active
            ORDER BY c.variant_id
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if cart.is_empty() {
            return Err(RepositoryError::Conflict("cart is empty".to_owned()));
        }

        for line in &cart {
            let reserved = sqlx::query(
                r"
                UPDATE shop.variant
                SET stock = stock - $2, updated_at = NOW()
                WHERE id = $1 AND stock >= $2
                ",
            )
            .bind(line.variant_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if reserved.rows_affected() == 0 {
                tracing::info!(variant_id = %line.variant_id, "Checkout refused: insufficient stock");
                return Err(RepositoryError::Conflict(format!(
                    "insufficient stock for {}",
                    line.sku
                )));
            }
        }

        let total = cart.iter().map(CartLine::line_total).sum::<Money>() + shipping_fee;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO shop.customer_order (user_id, status, total, shipping_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .bind(total)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        for line in &cart {
            sqlx::query(
                r"
                INSERT INTO shop.order_line (order_id, variant_id, product_name, sku, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order.id)
            .bind(line.variant_id)
            .bind(&line.product_name)
            .bind(&line.sku)
            .bind(line.unit_price)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let lines = order_lines(&mut tx, order.id).await?;
        tx.commit().await?;

        Ok(OrderDetail { order, lines })
    }

    /// Record the payment provider's session for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn attach_payment_session(
        &self,
        order_id: OrderId,
        session_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.customer_order SET payment_session_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(session_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Mark a pending order paid and empty the user's cart.
    ///
    /// Repeating the call on a paid order is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for someone else's order and
    /// `RepositoryError::Conflict` if the order can no longer be paid.
    pub async fn mark_paid(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = lock_order(&mut tx, user_id, order_id).await?;

        if order.status == OrderStatus::Paid {
            return Ok(order);
        }
        let next = order
            .status
            .transition(OrderStatus::Paid)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        let order = set_status(&mut tx, order.id, next).await?;
        sqlx::query("DELETE FROM shop.cart_item WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Cancel an unpaid order, returning reserved stock to the shelf.
    ///
    /// Only pending orders can be cancelled from the storefront; once paid,
    /// cancelling is a back-office decision. Repeating the call on a
    /// cancelled order is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for someone else's order and
    /// `RepositoryError::Conflict` if the order is already paid or further.
    pub async fn cancel_pending(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = lock_order(&mut tx, user_id, order_id).await?;

        match order.status {
            OrderStatus::Cancelled => return Ok(order),
            OrderStatus::Pending => {}
            status => {
                return Err(RepositoryError::Conflict(format!("order is already {status}")));
            }
        }

        restock(&mut tx, order.id).await?;
        let order = set_status(&mut tx, order.id, OrderStatus::Cancelled).await?;

        tx.commit().await?;
        Ok(order)
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

async fn lock_order(
    conn: &mut PgConnection,
    user_id: UserId,
    order_id: OrderId,
) -> Result<Order, RepositoryError> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1 AND user_id = $2 FOR UPDATE"
    ))
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound)
}

async fn set_status(
    conn: &mut PgConnection,
    order_id: OrderId,
    status: OrderStatus,
) -> Result<Order, RepositoryError> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "UPDATE shop.customer_order SET status = $2, updated_at = NOW() WHERE id = $1 \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .bind(status)
    .fetch_one(conn)
    .await?;

    Ok(order)
}

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
