//! Core types for Marketstall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod rating;
pub mod role;
pub mod settings;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use rating::{Rating, RatingError};
pub use role::{Role, RoleParseError};
pub use settings::{SettingError, SettingKey};
pub use status::{OrderStatus, StatusParseError, StatusTransitionError};
