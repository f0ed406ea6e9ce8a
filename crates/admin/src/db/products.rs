//! Catalogue and stock writes.

use sqlx::PgPool;

use marketstall_core::{ProductId, StockAdjustment, VariantId};

use super::{RepositoryError, map_constraint};
use crate::models::{LowStockVariant, Product, ProductDraft, Variant, VariantDraft, VariantUpdate};

const PRODUCT_COLUMNS: &str = "id, name, description, category, subcategory, price, image_path, \
                               active, created_at, updated_at";
const VARIANT_COLUMNS: &str =
    "id, product_id, sku, size, color, price_override, stock, created_at, updated_at";

/// Repository for products, variants and stock.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, including inactive ones, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO shop.product (name, description, category, subcategory, price, image_path, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(draft.category.trim())
        .bind(draft.subcategory.as_deref().map(str::trim))
        .bind(draft.price)
        .bind(draft.image_path.as_deref())
        .bind(draft.active)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE shop.product
            SET name = $2, description = $3, category = $4, subcategory = $5,
                price = $6, image_path = $7, active = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(draft.category.trim())
        .bind(draft.subcategory.as_deref().map(str::trim))
        .bind(draft.price)
        .bind(draft.image_path.as_deref())
        .bind(draft.active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its variants. Past order lines keep their
    /// snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// A product's variants ordered by SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants(&self, product_id: ProductId) -> Result<Vec<Variant>, RepositoryError> {
        let variants = sqlx::query_as::<_, Variant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM shop.variant WHERE product_id = $1 ORDER BY sku"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist and
    /// `RepositoryError::Conflict` if the SKU is taken.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        draft: &VariantDraft,
    ) -> Result<Variant, RepositoryError> {
        sqlx::query_as::<_, Variant>(&format!(
            r"
            INSERT INTO shop.variant (product_id, sku, size, color, price_override, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VARIANT_COLUMNS}
            "
        ))
        .bind(product_id)
        .bind(draft.sku.trim())
        .bind(draft.size.as_deref())
        .bind(draft.color.as_deref())
        .bind(draft.price_override)
        .bind(draft.stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "sku already exists"))
    }

    /// Replace a variant's descriptive fields. Stock is untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist and
    /// `RepositoryError::Conflict` if the SKU is taken.
    pub async fn update_variant(
        &self,
        id: VariantId,
        update: &VariantUpdate,
    ) -> Result<Variant, RepositoryError> {
        sqlx::query_as::<_, Variant>(&format!(
            r"
            UPDATE shop.variant
            SET sku = $2, size = $3, color = $4, price_override = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {VARIANT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.sku.trim())
        .bind(update.size.as_deref())
        .bind(update.color.as_deref())
        .bind(update.price_override)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, "sku already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    pub async fn delete_variant(&self, id: VariantId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.variant WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set a variant's stock to an absolute count.
    ///
    /// The row is locked while the adjustment's guard is checked, so two
    /// staff members editing the same count cannot silently overwrite each
    /// other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist and
    /// `RepositoryError::Conflict` if the guard no longer matches or the
    /// count is negative.
    pub async fn adjust_stock(
        &self,
        id: VariantId,
        adjustment: StockAdjustment,
    ) -> Result<Variant, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: i32 =
            sqlx::query_scalar("SELECT stock FROM shop.variant WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        let next = adjustment.apply(current).map_err(|e| {
            tracing::info!(variant_id = %id, error = %e, "Stock adjustment refused");
            RepositoryError::Conflict(e.to_string())
        })?;

        let variant = sqlx::query_as::<_, Variant>(&format!(
            "UPDATE shop.variant SET stock = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(variant)
    }

    /// Variants with stock at or below `threshold`, lowest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<LowStockVariant>, RepositoryError> {
        let variants = sqlx::query_as::<_, LowStockVariant>(
            r"
            SELECT v.id AS variant_id, p.id AS product_id, p.name AS product_name, v.sku, v.stock
            FROM shop.variant v
            JOIN shop.product p ON p.id = v.product_id
            WHERE v.stock <= $1
            ORDER BY v.stock, v.sku
            ",
        )
        .bind(threshold)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }
}
