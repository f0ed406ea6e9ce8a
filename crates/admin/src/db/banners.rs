//! Banner administration.

use sqlx::PgPool;

use marketstall_core::{Banner, BannerDraft, BannerId, PageType};

use super::RepositoryError;

const BANNER_COLUMNS: &str = "id, title, image_path, link_url, page_type, page_identifier, \
                              sort_order, start_date, end_date, active, created_at, updated_at";

/// Repository for banner CRUD.
///
/// Drafts are validated by the caller; the table's check constraints back
/// that up.
pub struct BannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every banner grouped by page type, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(&format!(
            "SELECT {BANNER_COLUMNS} FROM shop.banner ORDER BY page_type, sort_order, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BannerId) -> Result<Option<Banner>, RepositoryError> {
        let banner = sqlx::query_as::<_, Banner>(&format!(
            "SELECT {BANNER_COLUMNS} FROM shop.banner WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(banner)
    }

    /// Every banner on `page_type`, for previewing what a page would show.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_page_type(&self, page_type: PageType) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(&format!(
            "SELECT {BANNER_COLUMNS} FROM shop.banner WHERE page_type = $1"
        ))
        .bind(page_type)
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &BannerDraft) -> Result<Banner, RepositoryError> {
        let banner = sqlx::query_as::<_, Banner>(&format!(
            r"
            INSERT INTO shop.banner (title, image_path, link_url, page_type, page_identifier,
                                     sort_order, start_date, end_date, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BANNER_COLUMNS}
            "
        ))
        .bind(&draft.title)
        .bind(&draft.image_path)
        .bind(draft.link_url.as_deref())
        .bind(draft.page_type)
        .bind(draft.page_identifier.as_deref())
        .bind(draft.sort_order)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.active)
        .fetch_one(self.pool)
        .await?;

        Ok(banner)
    }

    /// Replace every editable field of a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    pub async fn update(&self, id: BannerId, draft: &BannerDraft) -> Result<Banner, RepositoryError> {
        sqlx::query_as::<_, Banner>(&format!(
            r"
            UPDATE shop.banner
            SET title = $2, image_path = $3, link_url = $4, page_type = $5,
                page_identifier = $6, sort_order = $7, start_date = $8, end_date = $9,
                active = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {BANNER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.image_path)
        .bind(draft.link_url.as_deref())
        .bind(draft.page_type)
        .bind(draft.page_identifier.as_deref())
        .bind(draft.sort_order)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    pub async fn delete(&self, id: BannerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.banner WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
