//! Store settings reads and writes.

use std::collections::BTreeMap;

use serde_json::Value;
use sqlx::PgPool;

use marketstall_core::SettingKey;

use super::RepositoryError;

/// Repository for the key/value settings table.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every known setting, defaults filled in. Unknown stored keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<BTreeMap<SettingKey, Value>, RepositoryError> {
        let rows: Vec<(String, Value)> = sqlx::query_as("SELECT key, value FROM shop.setting")
            .fetch_all(self.pool)
            .await?;

        let mut settings: BTreeMap<SettingKey, Value> = SettingKey::ALL
            .into_iter()
            .map(|key| (key, key.default_value()))
            .collect();
        for (key, value) in rows {
            if let Ok(key) = key.parse::<SettingKey>() {
                settings.insert(key, value);
            }
        }

        Ok(settings)
    }

    /// A single setting, or its default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, key: SettingKey) -> Result<Value, RepositoryError> {
        let value: Option<Value> =
            sqlx::query_scalar("SELECT value FROM shop.setting WHERE key = $1")
                .bind(key.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(value.unwrap_or_else(|| key.default_value()))
    }

    /// Store a setting. The value must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn put(&self, key: SettingKey, value: &Value) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.setting (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The low-stock threshold as an integer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored value is not a
    /// valid count.
    pub async fn low_stock_threshold(&self) -> Result<i32, RepositoryError> {
        let value = self.get(SettingKey::LowStockThreshold).await?;
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| *n >= 0)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("invalid low_stock_threshold: {value}"))
            })
    }
}
