//! Store settings reads.

use sqlx::PgPool;

use marketstall_core::{Money, SettingKey};

use super::RepositoryError;

/// Get a setting, falling back to its default when it was never written.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_setting(
    pool: &PgPool,
    key: SettingKey,
) -> Result<serde_json::Value, RepositoryError> {
    let value: Option<serde_json::Value> =
        sqlx::query_scalar("SELECT value FROM shop.setting WHERE key = $1")
            .bind(key.as_str())
            .fetch_optional(pool)
            .await?;

    Ok(value.unwrap_or_else(|| key.default_value()))
}

/// The flat shipping fee added at checkout.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the stored value is not a
/// valid amount.
pub async fn shipping_flat_fee(pool: &PgPool) -> Result<Money, RepositoryError> {
    let value = get_setting(pool, SettingKey::ShippingFlatFee).await?;
    serde_json::from_value::<Money>(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid shipping_flat_fee: {e}")))
}
