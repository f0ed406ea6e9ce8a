//! Stock adjustment rules.
//!
//! Staff set a variant's stock to an absolute count. Checkout decrements it
//! in the database with a guarded `UPDATE`; the rules here decide what the
//! guard must check so the same logic is testable without a database.

use serde::{Deserialize, Serialize};

/// Reasons a stock change is refused.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    #[error("stock cannot be negative (got {0})")]
    Negative(i32),

    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: i32, available: i32 },

    /// Someone else changed the count since it was read.
    #[error("stock changed concurrently: expected {expected}, found {actual}")]
    Conflict { expected: i32, actual: i32 },
}

/// An absolute stock update submitted by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// The new count. Replaces the current one.
    pub new_quantity: i32,
    /// When set, the update only applies if the current count still equals it.
    #[serde(default)]
    pub expected_previous: Option<i32>,
}

impl StockAdjustment {
    /// Reject values that can never be stored.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Negative`] for a negative quantity.
    pub const fn validate(&self) -> Result<(), StockError> {
        if self.new_quantity < 0 {
            return Err(StockError::Negative(self.new_quantity));
        }
        Ok(())
    }

    /// Apply the adjustment to the current count.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Negative`] or, when the guard does not match,
    /// [`StockError::Conflict`].
    pub const fn apply(&self, current: i32) -> Result<i32, StockError> {
        if let Err(e) = self.validate() {
            return Err(e);
        }
        if let Some(expected) = self.expected_previous
            && expected != current
        {
            return Err(StockError::Conflict {
                expected,
                actual: current,
            });
        }
        Ok(self.new_quantity)
    }
}

/// Take `requested` units out of `available`.
///
/// # Errors
///
/// Returns [`StockError::Negative`] for a negative request and
/// [`StockError::Insufficient`] when the shelf cannot cover it.
pub const fn reserve(available: i32, requested: i32) -> Result<i32, StockError> {
    if requested < 0 {
        return Err(StockError::Negative(requested));
    }
    if requested > available {
        return Err(StockError::Insufficient {
            requested,
            available,
        });
    }
    Ok(available - requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_replacement() {
        let adj = StockAdjustment {
            new_quantity: 12,
            expected_previous: None,
        };
        assert_eq!(adj.apply(3), Ok(12));
        assert_eq!(adj.apply(40), Ok(12));
    }

    #[test]
    fn test_rejects_negative() {
        let adj = StockAdjustment {
            new_quantity: -1,
            expected_previous: None,
        };
        assert_eq!(adj.validate(), Err(StockError::Negative(-1)));
        assert_eq!(adj.apply(5), Err(StockError::Negative(-1)));
    }

    #[test]
    fn test_expected_previous_guard() {
        let adj = StockAdjustment {
            new_quantity: 0,
            expected_previous: Some(4),
        };
        assert_eq!(adj.apply(4), Ok(0));
        assert_eq!(
            adj.apply(3),
            Err(StockError::Conflict {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_reserve_never_goes_negative() {
        assert_eq!(reserve(5, 5), Ok(0));
        assert_eq!(reserve(5, 2), Ok(3));
        assert_eq!(
            reserve(1, 2),
            Err(StockError::Insufficient {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(reserve(1, -1), Err(StockError::Negative(-1)));
    }

    #[test]
    fn test_guard_is_optional_in_json() {
        let adj: StockAdjustment = serde_json::from_str(r#"{"new_quantity": 7}"#).unwrap_or(
            StockAdjustment {
                new_quantity: -99,
                expected_previous: None,
            },
        );
        assert_eq!(adj.new_quantity, 7);
        assert_eq!(adj.expected_previous, None);
    }
}
