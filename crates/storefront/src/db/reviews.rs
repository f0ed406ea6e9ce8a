//! Review repository.

use sqlx::PgPool;

use marketstall_core::{ProductId, Rating, UserId};

use super::{RepositoryError, map_constraint};
use crate::models::Review;

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r"
            SELECT r.id, r.product_id, r.user_id, u.name AS author_name,
                   r.rating, r.comment, r.created_at
            FROM shop.review r
            JOIN shop.user_account u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Post a review. Each user may review a product once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed the
    /// product and `RepositoryError::NotFound` if the product is missing.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: Rating,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        sqlx::query_as::<_, Review>(
            r"
            WITH inserted AS (
                INSERT INTO shop.review (product_id, user_id, rating, comment)
                VALUES ($1, $2, $3, $4)
                RETURNING id, product_id, user_id, rating, comment, created_at
            )
            SELECT i.id, i.product_id, i.user_id, u.name AS author_name,
                   i.rating, i.comment, i.created_at
            FROM inserted i
            JOIN shop.user_account u ON u.id = i.user_id
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "product already reviewed"))
    }
}
