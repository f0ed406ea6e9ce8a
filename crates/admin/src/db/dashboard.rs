//! Dashboard aggregates.

use sqlx::PgPool;

use marketstall_core::{Money, OrderStatus};

use super::{RepositoryError, SettingsRepository};
use crate::models::{DashboardSummary, StatusCount};

/// Order counts per status, revenue and the low-stock count.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, RepositoryError> {
    let counts = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM shop.customer_order GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    let revenue_statuses: Vec<&str> = OrderStatus::ALL
        .into_iter()
        .filter(OrderStatus::is_revenue)
        .map(|s| s.as_str())
        .collect();
    let revenue: Money = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total), 0) FROM shop.customer_order WHERE status = ANY($1)",
    )
    .bind(&revenue_statuses)
    .fetch_one(pool)
    .await?;

    let threshold = SettingsRepository::new(pool).low_stock_threshold().await?;
    let low_stock: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shop.variant WHERE stock <= $1")
        .bind(threshold)
        .fetch_one(pool)
        .await?;

    Ok(DashboardSummary::with_all_statuses(
        &counts, revenue, low_stock, threshold,
    ))
}
