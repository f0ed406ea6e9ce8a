//! Back-office settings keys and their value rules.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Email, Money};

/// Errors raised while validating a setting.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// The key is not a known setting.
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    /// The value has the wrong shape for the key.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting key.
        key: SettingKey,
        /// What was wrong.
        reason: String,
    },
}

/// A known store setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Display name of the store (non-empty string).
    StoreName,
    /// Address shown to customers for support (email string).
    SupportEmail,
    /// Flat shipping fee added to each order (decimal string, >= 0).
    ShippingFlatFee,
    /// Variants at or below this stock count are reported as low (integer >= 0).
    LowStockThreshold,
}

impl SettingKey {
    /// Every setting key.
    pub const ALL: [Self; 4] = [
        Self::StoreName,
        Self::SupportEmail,
        Self::ShippingFlatFee,
        Self::LowStockThreshold,
    ];

    /// Database key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StoreName => "store_name",
            Self::SupportEmail => "support_email",
            Self::ShippingFlatFee => "shipping_flat_fee",
            Self::LowStockThreshold => "low_stock_threshold",
        }
    }

    /// Value used when the setting has never been written.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Self::StoreName => Value::from("Marketstall"),
            Self::SupportEmail => Value::from("support@marketstall.shop"),
            Self::ShippingFlatFee => Value::from("0.00"),
            Self::LowStockThreshold => Value::from(5),
        }
    }

    /// Check that `value` has the shape this key requires.
    ///
    /// # Errors
    ///
    /// Returns [`SettingError::InvalidValue`] describing the mismatch.
    pub fn validate(&self, value: &Value) -> Result<(), SettingError> {
        let invalid = |reason: &str| SettingError::InvalidValue {
            key: *self,
            reason: reason.to_owned(),
        };

        match self {
            Self::StoreName => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err(invalid("expected a non-empty string")),
            },
            Self::SupportEmail => value
                .as_str()
                .and_then(|s| Email::parse(s).ok())
                .map(|_| ())
                .ok_or_else(|| invalid("expected an email address")),
            Self::ShippingFlatFee => value
                .as_str()
                .and_then(|s| s.parse::<Decimal>().ok())
                .and_then(|d| Money::new(d).ok())
                .map(|_| ())
                .ok_or_else(|| invalid("expected a non-negative decimal string")),
            Self::LowStockThreshold => match value.as_i64() {
                Some(n) if n >= 0 && i32::try_from(n).is_ok() => Ok(()),
                _ => Err(invalid("expected a non-negative integer")),
            },
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingError::UnknownKey(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for key in SettingKey::ALL {
            assert_eq!(key.validate(&key.default_value()), Ok(()), "{key}");
        }
    }

    #[test]
    fn test_validation_rejects_wrong_shapes() {
        assert!(SettingKey::StoreName.validate(&json!("  ")).is_err());
        assert!(SettingKey::SupportEmail.validate(&json!("nobody")).is_err());
        assert!(SettingKey::ShippingFlatFee.validate(&json!("-1.00")).is_err());
        assert!(SettingKey::ShippingFlatFee.validate(&json!(4.5)).is_err());
        assert!(SettingKey::LowStockThreshold.validate(&json!(-1)).is_err());
        assert!(SettingKey::LowStockThreshold.validate(&json!("3")).is_err());
    }

    #[test]
    fn test_parse_unknown_key() {
        assert_eq!(
            "theme".parse::<SettingKey>(),
            Err(SettingError::UnknownKey("theme".to_owned()))
        );
        assert_eq!("store_name".parse::<SettingKey>(), Ok(SettingKey::StoreName));
    }
}
