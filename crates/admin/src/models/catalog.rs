//! Catalogue models and the drafts used to write them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketstall_core::{Money, ProductId, VariantId};

/// A product, active or not.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Money,
    pub image_path: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

fn blank(value: Option<&str>) -> bool {
    value.is_some_and(|s| s.trim().is_empty())
}

impl ProductDraft {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        if blank(self.subcategory.as_deref()) {
            return Err("subcategory must be null or non-empty".to_string());
        }
        if blank(self.image_path.as_deref()) {
            return Err("image_path must be null or non-empty".to_string());
        }
        Ok(())
    }
}

/// A sellable size/colour of a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Replaces the product price when set.
    pub price_override: Option<Money>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Variant creation payload. Initial stock may be set here; afterwards it
/// only changes through stock adjustments.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantDraft {
    pub sku: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub price_override: Option<Money>,
    #[serde(default)]
    pub stock: i32,
}

impl VariantDraft {
    /// Check the SKU and initial stock.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("sku must not be empty".to_string());
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        Ok(())
    }
}

/// Variant update payload. Stock is not editable here.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantUpdate {
    pub sku: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub price_override: Option<Money>,
}

impl VariantUpdate {
    /// # Errors
    ///
    /// Returns a message if the SKU is blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("sku must not be empty".to_string());
        }
        Ok(())
    }
}

/// A variant at or below the low-stock threshold.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LowStockVariant {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub stock: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_draft() -> ProductDraft {
        serde_json::from_str(r#"{"name": "Linen Shirt", "category": "women", "price": "39.90"}"#)
            .unwrap()
    }

    #[test]
    fn test_product_draft_defaults() {
        let draft = product_draft();
        assert!(draft.active);
        assert!(draft.description.is_empty());
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_product_draft_rejects_blank_fields() {
        let mut draft = product_draft();
        draft.category = " ".to_string();
        assert!(draft.validate().is_err());

        let mut draft = product_draft();
        draft.subcategory = Some(String::new());
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_product_draft_rejects_negative_price() {
        let result = serde_json::from_str::<ProductDraft>(
            r#"{"name": "Linen Shirt", "category": "women", "price": "-1.00"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_variant_draft_validation() {
        let draft: VariantDraft = serde_json::from_str(r#"{"sku": "LS-M-BLU"}"#).unwrap();
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.validate(), Ok(()));

        let draft: VariantDraft =
            serde_json::from_str(r#"{"sku": "LS-M-BLU", "stock": -2}"#).unwrap();
        assert!(draft.validate().is_err());
    }
}
