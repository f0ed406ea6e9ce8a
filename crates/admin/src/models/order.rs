//! Orders and reviews as seen by the back office.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketstall_core::{Email, Money, OrderId, OrderStatus, ProductId, Rating, ReviewId, UserId, VariantId};

/// An order header with the customer's email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_email: Email,
    pub status: OrderStatus,
    pub total: Money,
    pub shipping_address: String,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line snapshotted at checkout.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    pub variant_id: Option<VariantId>,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Money,
    pub quantity: i32,
}

/// An order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// A review awaiting moderation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewEntry {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub user_id: UserId,
    pub author_email: Email,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
