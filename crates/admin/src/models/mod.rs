//! Back-office models.

pub mod catalog;
pub mod dashboard;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::{LowStockVariant, Product, ProductDraft, Variant, VariantDraft, VariantUpdate};
pub use dashboard::{DashboardSummary, StatusCount};
pub use order::{Order, OrderDetail, OrderLine, ReviewEntry};
pub use session::{CurrentStaff, keys as session_keys};
pub use user::StaffUser;
