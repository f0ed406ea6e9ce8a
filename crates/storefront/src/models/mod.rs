//! Domain models for the storefront API.

pub mod catalog;
pub mod commerce;
pub mod session;
pub mod user;

pub use catalog::{CategoryEntry, Product, ProductDetail, RatingSummary, Review, Variant};
pub use commerce::{Cart, CartLine, Order, OrderDetail, OrderLine};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
