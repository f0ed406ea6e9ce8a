//! Marketstall Core - Shared domain types and rules.
//!
//! This crate provides the types and pure business rules used by every
//! Marketstall component:
//! - `storefront` - Public-facing shop API
//! - `admin` - Back-office API
//! - `cli` - Command-line tools for migrations and staff management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Rules that decide what a user may see or do live
//! here so they can be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, money, ratings, roles, order status, settings
//! - [`access`] - Admin operations, the role table, and the access gate
//! - [`banner`] - Banner visibility predicate and page targeting resolver
//! - [`stock`] - Stock adjustment rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod banner;
pub mod stock;
pub mod types;

pub use access::{
    AccessDenied, AccessGate, AdminOperation, OperationParseError, RoleTable, RoleTableError,
};
pub use banner::{
    Banner, BannerDraft, BannerSchedule, BannerValidationError, PageTarget, PageType,
    PageTypeParseError, is_eligible, resolve_for_page,
};
pub use stock::{StockAdjustment, StockError, reserve};
pub use types::*;
