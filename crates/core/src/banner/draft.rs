//! Banner input from the back office.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BannerSchedule, PageTarget, PageType};

/// Reasons a banner draft is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BannerValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("image_path must not be empty")]
    EmptyImagePath,

    /// Page-type-wide banners use a null identifier, never `""`.
    #[error("page_identifier must be null or non-empty")]
    EmptyPageIdentifier,

    #[error("link_url must be null or non-empty")]
    EmptyLinkUrl,

    /// Stored text is matched exactly, so padding is refused rather than trimmed.
    #[error("{field} must not have leading or trailing whitespace")]
    SurroundingWhitespace { field: &'static str },

    #[error("start_date {start} is after end_date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// The editable fields of a banner, as submitted by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerDraft {
    pub title: String,
    pub image_path: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub page_type: PageType,
    #[serde(default)]
    pub page_identifier: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

fn is_padded(value: &str) -> bool {
    value.trim().len() != value.len()
}

impl BannerDraft {
    /// Check the draft before it is stored.
    ///
    /// # Errors
    ///
    /// Returns the first [`BannerValidationError`] found.
    pub fn validate(&self) -> Result<(), BannerValidationError> {
        if self.title.trim().is_empty() {
            return Err(BannerValidationError::EmptyTitle);
        }
        if is_padded(&self.title) {
            return Err(BannerValidationError::SurroundingWhitespace { field: "title" });
        }
        if self.image_path.trim().is_empty() {
            return Err(BannerValidationError::EmptyImagePath);
        }
        if let Some(identifier) = self.page_identifier.as_deref() {
            if identifier.trim().is_empty() {
                return Err(BannerValidationError::EmptyPageIdentifier);
            }
            if is_padded(identifier) {
                return Err(BannerValidationError::SurroundingWhitespace {
                    field: "page_identifier",
                });
            }
        }
        if self.link_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(BannerValidationError::EmptyLinkUrl);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(BannerValidationError::StartAfterEnd { start, end });
        }
        Ok(())
    }

    #[must_use]
    pub const fn schedule(&self) -> BannerSchedule {
        BannerSchedule {
            active: self.active,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    #[must_use]
    pub fn target(&self) -> PageTarget {
        PageTarget {
            page_type: self.page_type,
            page_identifier: self.page_identifier.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::date;
    use super::*;

    fn draft() -> BannerDraft {
        serde_json::from_str(
            r#"{"title": "Spring sale", "image_path": "/uploads/spring.png", "page_type": "home"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_draft_defaults() {
        let d = draft();
        assert!(d.active);
        assert_eq!(d.sort_order, 0);
        assert!(d.target().is_page_wide());
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let mut d = draft();
        d.title = "  ".to_owned();
        assert_eq!(d.validate(), Err(BannerValidationError::EmptyTitle));

        let mut d = draft();
        d.image_path = String::new();
        assert_eq!(d.validate(), Err(BannerValidationError::EmptyImagePath));

        let mut d = draft();
        d.page_identifier = Some(String::new());
        assert_eq!(d.validate(), Err(BannerValidationError::EmptyPageIdentifier));

        d.page_identifier = Some("   ".to_owned());
        assert_eq!(d.validate(), Err(BannerValidationError::EmptyPageIdentifier));
    }

    #[test]
    fn test_rejects_padded_text() {
        let mut d = draft();
        d.page_identifier = Some(" women".to_owned());
        assert_eq!(
            d.validate(),
            Err(BannerValidationError::SurroundingWhitespace {
                field: "page_identifier"
            })
        );

        let mut d = draft();
        d.title = "Spring sale ".to_owned();
        assert_eq!(
            d.validate(),
            Err(BannerValidationError::SurroundingWhitespace { field: "title" })
        );

        let mut d = draft();
        d.page_identifier = Some("women".to_owned());
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let mut d = draft();
        d.start_date = Some(date(2025, 2, 2));
        d.end_date = Some(date(2025, 2, 1));
        assert!(matches!(
            d.validate(),
            Err(BannerValidationError::StartAfterEnd { .. })
        ));

        d.end_date = Some(date(2025, 2, 2));
        assert_eq!(d.validate(), Ok(()));
    }
}
