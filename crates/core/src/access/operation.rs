//! Back-office operations.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when an operation name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown admin operation: {0}")]
pub struct OperationParseError(pub String);

/// An action in the back office that requires permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminOperation {
    ViewDashboard,
    ViewProducts,
    EditProducts,
    ViewStock,
    EditStock,
    ViewOrders,
    EditOrders,
    ViewBanners,
    EditBanners,
    ViewUsers,
    ManageUsers,
    ViewSettings,
    EditSettings,
    UploadFiles,
    ModerateReviews,
}

impl AdminOperation {
    /// Every operation.
    pub const ALL: [Self; 15] = [
        Self::ViewDashboard,
        Self::ViewProducts,
        Self::EditProducts,
        Self::ViewStock,
        Self::EditStock,
        Self::ViewOrders,
        Self::EditOrders,
        Self::ViewBanners,
        Self::EditBanners,
        Self::ViewUsers,
        Self::ManageUsers,
        Self::ViewSettings,
        Self::EditSettings,
        Self::UploadFiles,
        Self::ModerateReviews,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ViewProducts => "view_products",
            Self::EditProducts => "edit_products",
            Self::ViewStock => "view_stock",
            Self::EditStock => "edit_stock",
            Self::ViewOrders => "view_orders",
            Self::EditOrders => "edit_orders",
            Self::ViewBanners => "view_banners",
            Self::EditBanners => "edit_banners",
            Self::ViewUsers => "view_users",
            Self::ManageUsers => "manage_users",
            Self::ViewSettings => "view_settings",
            Self::EditSettings => "edit_settings",
            Self::UploadFiles => "upload_files",
            Self::ModerateReviews => "moderate_reviews",
        }
    }

    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

impl fmt::Display for AdminOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminOperation {
    type Err = OperationParseError;

    /// Accepts the canonical name plus human spellings such as
    /// `"edit banner"` or `"Manage-Users"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::lookup(&normalized)
            .or_else(|| Self::lookup(&format!("{normalized}s")))
            .ok_or_else(|| OperationParseError(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for AdminOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
