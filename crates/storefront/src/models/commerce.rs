//! Cart and order models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketstall_core::{Money, OrderId, OrderStatus, ProductId, UserId, VariantId};

/// A cart line joined with its variant and product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub unit_price: Money,
    pub quantity: i32,
    /// Stock currently on the shelf; checkout re-checks it.
    pub available: i32,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * u32::try_from(self.quantity).unwrap_or_default()
    }
}

/// A customer's cart.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub item_count: i64,
    pub subtotal: Money,
}

impl Cart {
    /// Build a cart from its lines, computing totals.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal = lines.iter().map(CartLine::line_total).sum();
        let item_count = lines.iter().map(|line| i64::from(line.quantity)).sum();
        Self {
            lines,
            item_count,
            subtotal,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// An order header.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total: Money,
    pub shipping_address: String,
    #[serde(skip_serializing)]
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line snapshotted at checkout.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    /// `None` once the variant has been deleted.
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn line(variant: i64, price: &str, quantity: i32) -> CartLine {
        CartLine {
            variant_id: VariantId::new(variant),
            product_id: ProductId::new(1),
            product_name: "Linen shirt".to_string(),
            sku: format!("SKU-{variant}"),
            size: None,
            color: None,
            unit_price: Money::new(price.parse::<Decimal>().unwrap()).unwrap(),
            quantity,
            available: 10,
        }
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::from_lines(vec![line(1, "12.50", 2), line(2, "3.00", 1)]);
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.subtotal.to_string(), "28.00");
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::from_lines(Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, Money::ZERO);
    }
}
