//! Dashboard aggregates.

use serde::Serialize;

use marketstall_core::{Money, OrderStatus};

/// Number of orders in one status.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Headline numbers for the back-office landing page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Every status, zero counts included.
    pub orders_by_status: Vec<StatusCount>,
    /// Sum of totals over paid, shipped and delivered orders.
    pub revenue: Money,
    pub low_stock_variants: i64,
    pub low_stock_threshold: i32,
}

impl DashboardSummary {
    /// Fill in zero counts so every status is present, in lifecycle order.
    #[must_use]
    pub fn with_all_statuses(
        counts: &[StatusCount],
        revenue: Money,
        low_stock_variants: i64,
        low_stock_threshold: i32,
    ) -> Self {
        let orders_by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: counts
                    .iter()
                    .find(|c| c.status == status)
                    .map_or(0, |c| c.count),
            })
            .collect();

        Self {
            orders_by_status,
            revenue,
            low_stock_variants,
            low_stock_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_statuses_are_zero() {
        let summary = DashboardSummary::with_all_statuses(
            &[StatusCount {
                status: OrderStatus::Paid,
                count: 4,
            }],
            Money::ZERO,
            2,
            5,
        );

        assert_eq!(summary.orders_by_status.len(), OrderStatus::ALL.len());
        let paid = summary
            .orders_by_status
            .iter()
            .find(|c| c.status == OrderStatus::Paid)
            .map(|c| c.count);
        assert_eq!(paid, Some(4));
        assert!(
            summary
                .orders_by_status
                .iter()
                .filter(|c| c.status != OrderStatus::Paid)
                .all(|c| c.count == 0)
        );
    }
}
