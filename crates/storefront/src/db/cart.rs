//! Cart repository.

use sqlx::PgPool;

use marketstall_core::{UserId, VariantId};

use super::{RepositoryError, map_constraint};
use crate::models::CartLine;

/// Most units of one variant a cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Outcome of adding to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Applied,
    /// The line would exceed [`MAX_LINE_QUANTITY`]; nothing was written.
    LimitReached,
}

/// Repository for a customer's cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All lines of a user's cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.variant_id, p.id AS product_id, p.name AS product_name, v.sku,
                   v.size, v.color, COALESCE(v.price_override, p.price) AS unit_price,
                   c.quantity, v.stock AS available
            FROM shop.cart_item c
            JOIN shop.variant v ON v.id = c.variant_id
            JOIN shop.product p ON p.id = v.product_id
            WHERE c.user_id = $1
            ORDER BY c.added_at, c.variant_id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add `quantity` of a variant, incrementing an existing line.
    ///
    /// A line never grows past [`MAX_LINE_QUANTITY`]; an add that would
    /// overflow it changes nothing and reports [`LineChange::LimitReached`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist or
    /// belongs to an inactive product.
    pub async fn add(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<LineChange, RepositoryError> {
        if quantity > MAX_LINE_QUANTITY {
            return Ok(LineChange::LimitReached);
        }

        let result = sqlx::query(
            r"
            INSERT INTO shop.cart_item (user_id, variant_id, quantity)
            SELECT $1, v.id, $3
            FROM shop.variant v
            JOIN shop.product p ON p.id = v.product_id
            WHERE v.id = $2 AND p.active
            ON CONFLICT (user_id, variant_id)
            DO UPDATE SET quantity = shop.cart_item.quantity + EXCLUDED.quantity
            WHERE shop.cart_item.quantity + EXCLUDED.quantity <= $4
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .execute(self.pool)
        .await
        .map_err(|e| map_constraint(e, "cart line already exists"))?;

        if result.rows_affected() > 0 {
            return Ok(LineChange::Applied);
        }

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM shop.cart_item WHERE user_id = $1 AND variant_id = $2",
        )
        .bind(user_id)
        .bind(variant_id)
        .fetch_optional(self.pool)
        .await?;

        match existing {
            Some(_) => Ok(LineChange::LimitReached),
            None => Err(RepositoryError::NotFound),
        }
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return self.remove(user_id, variant_id).await;
        }

        let result = sqlx::query(
            "UPDATE shop.cart_item SET quantity = $3 WHERE user_id = $1 AND variant_id = $2",
        )
        .bind(user_id)
        .bind(variant_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    pub async fn remove(&self, user_id: UserId, variant_id: VariantId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM shop.cart_item WHERE user_id = $1 AND variant_id = $2")
                .bind(user_id)
                .bind(variant_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
