//! Page targets.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when a page type name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown page type: {0}")]
pub struct PageTypeParseError(pub String);

/// The kind of storefront page a banner is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Home,
    Category,
    Subcategory,
    Filter,
    Promotion,
}

impl PageType {
    /// Every page type.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Category,
        Self::Subcategory,
        Self::Filter,
        Self::Promotion,
    ];

    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Filter => "filter",
            Self::Promotion => "promotion",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = PageTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == normalized)
            .ok_or_else(|| PageTypeParseError(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for PageType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PageType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PageType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PageType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Where a banner is placed: a page type plus an optional identifier.
///
/// A `None` identifier is the page-type-wide default. It matches any page of
/// that type, but a banner naming the exact identifier takes priority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageTarget {
    pub page_type: PageType,
    pub page_identifier: Option<String>,
}

impl PageTarget {
    /// A page-type-wide target.
    #[must_use]
    pub const fn page_wide(page_type: PageType) -> Self {
        Self {
            page_type,
            page_identifier: None,
        }
    }

    /// A target for one specific page.
    #[must_use]
    pub fn specific(page_type: PageType, identifier: impl Into<String>) -> Self {
        Self {
            page_type,
            page_identifier: Some(identifier.into()),
        }
    }

    /// Whether this target is the page-type-wide default.
    #[must_use]
    pub const fn is_page_wide(&self) -> bool {
        self.page_identifier.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_type() {
        assert_eq!("home".parse::<PageType>().unwrap(), PageType::Home);
        assert_eq!(" Category ".parse::<PageType>().unwrap(), PageType::Category);
        assert!("landing".parse::<PageType>().is_err());
    }

    #[test]
    fn test_page_type_json_is_snake_case() {
        let json = serde_json::to_string(&PageType::Subcategory).unwrap();
        assert_eq!(json, "\"subcategory\"");
        let parsed: PageType = serde_json::from_str("\"promotion\"").unwrap();
        assert_eq!(parsed, PageType::Promotion);
    }
}
