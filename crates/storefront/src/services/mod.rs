//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and password login
//! - `banners` - Banner selection for a page
//! - `checkout` - Order placement and payment callbacks
//! - `payment` - Hosted checkout provider client

pub mod auth;
pub mod banners;
pub mod checkout;
pub mod payment;
