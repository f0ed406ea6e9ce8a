//! Banner reads.

use sqlx::PgPool;

use marketstall_core::{Banner, PageType};

use super::RepositoryError;

/// Read-only access to banners.
pub struct BannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every banner placed on `page_type`, active or not.
    ///
    /// Date and identifier filtering happen in the resolver, not here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_page_type(&self, page_type: PageType) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(
            r"
            SELECT id, title, image_path, link_url, page_type, page_identifier,
                   sort_order, start_date, end_date, active, created_at, updated_at
            FROM shop.banner
            WHERE page_type = $1
            ",
        )
        .bind(page_type)
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }
}
