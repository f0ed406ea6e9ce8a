//! Account roles.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when a role name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

/// The role attached to an account.
///
/// Every account has exactly one role. Self-registered shoppers are
/// [`Role::Customer`]; everything else is a staff role whose back-office
/// permissions come from the [`RoleTable`](crate::RoleTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every back-office operation.
    Administrator,
    /// Maintains stock counts.
    StockManager,
    /// Handles orders and customer reviews.
    SalesManager,
    /// Maintains the catalogue and its stock.
    PurchaseManager,
    /// Maintains banners and imagery.
    Designer,
    /// A shopper with no back-office access.
    Customer,
}

impl Role {
    /// Every role, in table order.
    pub const ALL: [Self; 6] = [
        Self::Administrator,
        Self::StockManager,
        Self::SalesManager,
        Self::PurchaseManager,
        Self::Designer,
        Self::Customer,
    ];

    /// Canonical snake_case name, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::StockManager => "stock_manager",
            Self::SalesManager => "sales_manager",
            Self::PurchaseManager => "purchase_manager",
            Self::Designer => "designer",
            Self::Customer => "customer",
        }
    }

    /// Whether the role belongs to back-office staff.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        !matches!(self, Self::Customer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Accepts snake_case, kebab-case, or space separated names in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "stock_manager" => Ok(Self::StockManager),
            "sales_manager" => Ok(Self::SalesManager),
            "purchase_manager" => Ok(Self::PurchaseManager),
            "designer" => Ok(Self::Designer),
            "customer" | "plain_customer" => Ok(Self::Customer),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_spellings() {
        assert_eq!("stock-manager".parse::<Role>().unwrap(), Role::StockManager);
        assert_eq!("Sales Manager".parse::<Role>().unwrap(), Role::SalesManager);
        assert_eq!("plain-customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("ADMINISTRATOR".parse::<Role>().unwrap(), Role::Administrator);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("owner".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_only_customer_is_not_staff() {
        let staff: Vec<Role> = Role::ALL.into_iter().filter(Role::is_staff).collect();
        assert_eq!(staff.len(), 5);
        assert!(!Role::Customer.is_staff());
    }
}
