//! Date-range visibility.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// When a banner may be shown.
///
/// Both bounds are inclusive calendar dates; an unset bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BannerSchedule {
    pub active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BannerSchedule {
    /// An active schedule with no date bounds.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            active: true,
            start_date: None,
            end_date: None,
        }
    }

    /// Whether the banner is visible on `today`.
    #[must_use]
    pub fn is_eligible_on(&self, today: NaiveDate) -> bool {
        self.active
            && self.start_date.is_none_or(|start| start <= today)
            && self.end_date.is_none_or(|end| end >= today)
    }
}
