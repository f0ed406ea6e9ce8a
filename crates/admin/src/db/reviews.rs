//! Review moderation.

use sqlx::PgPool;

use marketstall_core::ReviewId;

use super::RepositoryError;
use crate::models::ReviewEntry;

/// Repository for moderating customer reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The most recent reviews across all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ReviewEntry>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewEntry>(
            r"
            SELECT r.id, r.product_id, p.name AS product_name, r.user_id,
                   u.email AS author_email, r.rating, r.comment, r.created_at
            FROM shop.review r
            JOIN shop.product p ON p.id = r.product_id
            JOIN shop.user_account u ON u.id = r.user_id
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.review WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
