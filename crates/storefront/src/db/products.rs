//! Catalogue queries.
//!
//! Only active products are visible to the storefront; inactive ones behave
//! as if they did not exist.

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use marketstall_core::ProductId;

use super::RepositoryError;
use crate::models::{CategoryEntry, Product, RatingSummary, Variant};

/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Case-insensitive substring of name or description.
    pub query: Option<String>,
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

impl ProductFilter {
    fn limit(&self) -> i64 {
        i64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }

    fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// One page of products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Repository for catalogue reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, RepositoryError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM shop.product p");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.name, p.description, p.category, p.subcategory, p.price, \
             p.image_path, p.created_at, p.updated_at FROM shop.product p",
        );
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
            .push_bind(filter.limit())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let items = select
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(ProductPage {
            items,
            page: filter.page.max(1),
            per_page: filter.per_page.clamp(1, MAX_PER_PAGE),
            total,
        })
    }

    /// Get an active product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, subcategory, price,
                   image_path, created_at, updated_at
            FROM shop.product
            WHERE id = $1 AND active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Variants of a product, cheapest SKU first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants(&self, product_id: ProductId) -> Result<Vec<Variant>, RepositoryError> {
        let variants = sqlx::query_as::<_, Variant>(
            r"
            SELECT v.id, v.product_id, v.sku, v.size, v.color,
                   COALESCE(v.price_override, p.price) AS price, v.stock
            FROM shop.variant v
            JOIN shop.product p ON p.id = v.product_id
            WHERE v.product_id = $1
            ORDER BY v.sku
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Review count and average for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rating_summary(
        &self,
        product_id: ProductId,
    ) -> Result<RatingSummary, RepositoryError> {
        let (count, average): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating)::FLOAT8 FROM shop.review WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(RatingSummary { count, average })
    }

    /// Distinct category/subcategory pairs of active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<CategoryEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, CategoryEntry>(
            r"
            SELECT DISTINCT category, subcategory
            FROM shop.product
            WHERE active
            ORDER BY category, subcategory NULLS FIRST
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}

fn push_filters<'q>(builder: &mut QueryBuilder<'q, Postgres>, filter: &'q ProductFilter) {
    builder.push(" WHERE p.active");
    if let Some(category) = &filter.category {
        builder.push(" AND p.category = ").push_bind(category);
    }
    if let Some(subcategory) = &filter.subcategory {
        builder.push(" AND p.subcategory = ").push_bind(subcategory);
    }
    if let Some(query) = &filter.query {
        let pattern = format!("%{}%", escape_like(query));
        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_pagination_bounds() {
        let filter = ProductFilter {
            page: 0,
            per_page: 1000,
            ..ProductFilter::default()
        };
        assert_eq!(filter.limit(), i64::from(MAX_PER_PAGE));
        assert_eq!(filter.offset(), 0);

        let filter = ProductFilter {
            page: 3,
            per_page: 20,
            ..ProductFilter::default()
        };
        assert_eq!(filter.offset(), 40);
    }
}
