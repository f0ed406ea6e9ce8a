//! Catalogue read models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketstall_core::{Money, ProductId, Rating, ReviewId, UserId, VariantId};

/// An active product as listed in the shop.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Money,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable size/colour of a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Price charged for this variant (override or product price).
    pub price: Money,
    pub stock: i32,
}

impl Variant {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Aggregate of a product's reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: i64,
    /// Mean star rating, absent when there are no reviews.
    pub average: Option<f64>,
}

/// Product page payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
    pub rating: RatingSummary,
}

/// One entry of the category navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CategoryEntry {
    pub category: String,
    pub subcategory: Option<String>,
}

/// A customer review with the author's display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub author_name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
