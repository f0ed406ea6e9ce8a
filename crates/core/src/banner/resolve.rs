//! Page targeting.

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::{Banner, PageType, is_eligible};

/// Select and order the banners to show on one page.
///
/// Keeps eligible banners of `page_type`. With an identifier, banners naming
/// that identifier and page-type-wide defaults (no identifier) are kept;
/// without one, only the defaults are. The result is ordered by
/// `sort_order`, then exact matches before defaults, then `id`.
///
/// # Example
///
/// ```
/// # use chrono::{NaiveDate, Utc};
/// # use marketstall_core::{Banner, BannerId, PageType, resolve_for_page};
/// # let now = Utc::now();
/// # let banner = |id, identifier: Option<&str>| Banner {
/// #     id: BannerId::new(id),
/// #     title: format!("Banner {id}"),
/// #     image_path: "/uploads/b.png".to_owned(),
/// #     link_url: None,
/// #     page_type: PageType::Category,
/// #     page_identifier: identifier.map(str::to_owned),
/// #     sort_order: 0,
/// #     start_date: None,
/// #     end_date: None,
/// #     active: true,
/// #     created_at: now,
/// #     updated_at: now,
/// # };
/// let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
/// let banners = vec![banner(1, None), banner(2, Some("women")), banner(3, Some("men"))];
///
/// let shown = resolve_for_page(banners, PageType::Category, Some("women"), today);
/// let ids: Vec<i64> = shown.iter().map(|b| b.id.as_i64()).collect();
/// assert_eq!(ids, vec![2, 1]);
/// ```
#[must_use]
pub fn resolve_for_page(
    banners: Vec<Banner>,
    page_type: PageType,
    page_identifier: Option<&str>,
    today: NaiveDate,
) -> Vec<Banner> {
    let mut shown: Vec<Banner> = banners
        .into_iter()
        .filter(|banner| banner.page_type == page_type && is_eligible(banner, today))
        .filter(|banner| match (banner.page_identifier.as_deref(), page_identifier) {
            (None, _) => true,
            (Some(own), Some(wanted)) => own == wanted,
            (Some(_), None) => false,
        })
        .collect();

    shown.sort_by(display_order);
    shown
}

fn display_order(a: &Banner, b: &Banner) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        // Exact matches (Some) sort before defaults (None).
        .then_with(|| b.page_identifier.is_some().cmp(&a.page_identifier.is_some()))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::{banner, date};
    use super::*;

    fn ids(banners: &[Banner]) -> Vec<i64> {
        banners.iter().map(|b| b.id.as_i64()).collect()
    }

    #[test]
    fn test_specific_match_before_default_with_same_sort_order() {
        let today = date(2025, 5, 1);
        let banners = vec![
            banner(1, PageType::Category, None),
            banner(2, PageType::Category, Some("women")),
        ];

        let shown = resolve_for_page(banners, PageType::Category, Some("women"), today);
        assert_eq!(ids(&shown), vec![2, 1]);
    }

    #[test]
    fn test_sort_order_dominates_specificity() {
        let today = date(2025, 5, 1);
        let mut default = banner(1, PageType::Category, None);
        default.sort_order = 0;
        let mut specific = banner(2, PageType::Category, Some("women"));
        specific.sort_order = 10;

        let shown = resolve_for_page(
            vec![specific, default],
            PageType::Category,
            Some("women"),
            today,
        );
        assert_eq!(ids(&shown), vec![1, 2]);
    }

    #[test]
    fn test_other_identifiers_and_page_types_are_dropped() {
        let today = date(2025, 5, 1);
        let banners = vec![
            banner(1, PageType::Category, Some("men")),
            banner(2, PageType::Subcategory, Some("women")),
            banner(3, PageType::Category, Some("women")),
        ];

        let shown = resolve_for_page(banners, PageType::Category, Some("women"), today);
        assert_eq!(ids(&shown), vec![3]);
    }

    #[test]
    fn test_without_identifier_only_defaults_are_kept() {
        let today = date(2025, 5, 1);
        let banners = vec![
            banner(1, PageType::Category, Some("women")),
            banner(2, PageType::Category, None),
        ];

        let shown = resolve_for_page(banners, PageType::Category, None, today);
        assert_eq!(ids(&shown), vec![2]);
    }

    #[test]
    fn test_home_banners_respect_dates() {
        let today = date(2025, 5, 10);
        let always = banner(1, PageType::Home, None);
        let mut current = banner(2, PageType::Home, None);
        current.start_date = Some(date(2025, 5, 9));
        current.end_date = Some(date(2025, 5, 11));
        let mut expired = banner(3, PageType::Home, None);
        expired.end_date = Some(date(2025, 5, 9));

        let shown = resolve_for_page(vec![expired, current, always], PageType::Home, None, today);
        assert_eq!(ids(&shown), vec![1, 2]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let today = date(2025, 5, 1);
        let banners = vec![
            banner(7, PageType::Promotion, Some("summer")),
            banner(3, PageType::Promotion, Some("summer")),
            banner(5, PageType::Promotion, Some("summer")),
        ];

        let shown = resolve_for_page(banners, PageType::Promotion, Some("summer"), today);
        assert_eq!(ids(&shown), vec![3, 5, 7]);
    }
}
