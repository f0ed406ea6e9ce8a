//! Banner selection for storefront pages.

use std::future::Future;

use chrono::NaiveDate;
use sqlx::PgPool;

use marketstall_core::{Banner, PageType, resolve_for_page};

use crate::db::{BannerRepository, RepositoryError};

/// Source of candidate banners.
pub trait BannerStore: Send + Sync {
    /// Every banner placed on `page_type`.
    fn candidates(
        &self,
        page_type: PageType,
    ) -> impl Future<Output = Result<Vec<Banner>, RepositoryError>> + Send;
}

impl BannerStore for PgPool {
    async fn candidates(&self, page_type: PageType) -> Result<Vec<Banner>, RepositoryError> {
        BannerRepository::new(self).for_page_type(page_type).await
    }
}

/// Picks the banners to show on a page.
///
/// A failing store is logged and treated as "no banners": an empty banner
/// slot is a normal page state, a failed page is not.
#[derive(Debug, Clone)]
pub struct BannerService<S> {
    store: S,
}

impl<S: BannerStore> BannerService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Banners for a page on `today`, in display order.
    pub async fn for_page(
        &self,
        page_type: PageType,
        page_identifier: Option<&str>,
        today: NaiveDate,
    ) -> Vec<Banner> {
        match self.store.candidates(page_type).await {
            Ok(candidates) => resolve_for_page(candidates, page_type, page_identifier, today),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    page_type = %page_type,
                    page_identifier = page_identifier.unwrap_or(""),
                    "Banner lookup failed; serving no banners"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use marketstall_core::BannerId;

    use super::*;

    struct FixedStore(Vec<Banner>);

    impl BannerStore for FixedStore {
        async fn candidates(&self, page_type: PageType) -> Result<Vec<Banner>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|b| b.page_type == page_type)
                .cloned()
                .collect())
        }
    }

    struct BrokenStore;

    impl BannerStore for BrokenStore {
        async fn candidates(&self, _page_type: PageType) -> Result<Vec<Banner>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn banner(id: i64, page_type: PageType, identifier: Option<&str>) -> Banner {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Banner {
            id: BannerId::new(id),
            title: format!("Banner {id}"),
            image_path: format!("/uploads/{id}.png"),
            link_url: None,
            page_type,
            page_identifier: identifier.map(str::to_owned),
            sort_order: 0,
            start_date: None,
            end_date: None,
            active: true,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[tokio::test]
    async fn test_store_failure_yields_no_banners() {
        let service = BannerService::new(BrokenStore);
        let banners = service.for_page(PageType::Home, None, today()).await;
        assert!(banners.is_empty());
    }

    #[tokio::test]
    async fn test_resolves_candidates_from_store() {
        let mut expired = banner(3, PageType::Category, Some("women"));
        expired.end_date = Some(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());

        let service = BannerService::new(FixedStore(vec![
            banner(1, PageType::Category, None),
            banner(2, PageType::Category, Some("women")),
            expired,
            banner(4, PageType::Home, None),
        ]));

        let banners = service
            .for_page(PageType::Category, Some("women"), today())
            .await;
        let ids: Vec<i64> = banners.iter().map(|b| b.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
