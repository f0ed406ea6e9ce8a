//! Banner visibility.
//!
//! A banner is shown on a storefront page when it is eligible today and its
//! [`PageTarget`] matches the page. Both decisions are pure functions of the
//! banner rows and the date, recomputed on every read.

mod draft;
mod page;
mod resolve;
mod schedule;

pub use draft::{BannerDraft, BannerValidationError};
pub use page::{PageTarget, PageType, PageTypeParseError};
pub use resolve::resolve_for_page;
pub use schedule::BannerSchedule;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::BannerId;

/// A promotional image placed on a storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_path: String,
    pub link_url: Option<String>,
    pub page_type: PageType,
    pub page_identifier: Option<String>,
    pub sort_order: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    /// The banner's visibility window.
    #[must_use]
    pub const fn schedule(&self) -> BannerSchedule {
        BannerSchedule {
            active: self.active,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// The page the banner is placed on.
    #[must_use]
    pub fn target(&self) -> PageTarget {
        PageTarget {
            page_type: self.page_type,
            page_identifier: self.page_identifier.clone(),
        }
    }
}

/// Whether `banner` is visible on `today`.
///
/// True when the banner is active and `today` falls inside its optional
/// start and end dates, both inclusive.
#[must_use]
pub fn is_eligible(banner: &Banner, today: NaiveDate) -> bool {
    banner.schedule().is_eligible_on(today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{Banner, PageType};
    use crate::types::BannerId;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn banner(id: i64, page_type: PageType, identifier: Option<&str>) -> Banner {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Banner {
            id: BannerId::new(id),
            title: format!("Banner {id}"),
            image_path: format!("/uploads/banner-{id}.png"),
            link_url: None,
            page_type,
            page_identifier: identifier.map(str::to_owned),
            sort_order: 0,
            start_date: None,
            end_date: None,
            active: true,
            created_at: stamp,
            updated_at: stamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::{banner, date};
    use super::*;

    #[test]
    fn test_inactive_banner_is_ineligible() {
        let mut b = banner(1, PageType::Home, None);
        b.active = false;
        assert!(!is_eligible(&b, date(2025, 4, 1)));
    }

    #[test]
    fn test_eligible_across_whole_window() {
        let mut b = banner(1, PageType::Home, None);
        b.start_date = Some(date(2025, 4, 1));
        b.end_date = Some(date(2025, 4, 3));
        assert!(!is_eligible(&b, date(2025, 3, 31)));
        assert!(is_eligible(&b, date(2025, 4, 1)));
        assert!(is_eligible(&b, date(2025, 4, 2)));
        assert!(is_eligible(&b, date(2025, 4, 3)));
        assert!(!is_eligible(&b, date(2025, 4, 4)));
    }

    #[test]
    fn test_json_roundtrip_keeps_nulls() {
        let mut b = banner(9, PageType::Category, None);
        b.link_url = Some("https://example.com/sale".to_owned());
        b.end_date = Some(date(2025, 12, 31));

        let json = serde_json::to_value(&b).unwrap();
        assert!(json["page_identifier"].is_null());
        assert!(json["start_date"].is_null());
        assert_eq!(json["end_date"], "2025-12-31");
        assert_eq!(json["page_type"], "category");

        let back: Banner = serde_json::from_value(json).unwrap();
        assert_eq!(back, b);
    }
}
