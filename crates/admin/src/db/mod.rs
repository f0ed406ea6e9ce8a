//! Database operations for the back office.
//!
//! # Schema: `shop`
//!
//! The back office shares the storefront's schema and owns the staff-side
//! writes:
//!
//! - `product` / `variant` - Catalogue and stock
//! - `customer_order` - Status changes after checkout
//! - `banner` - Merchandising banners
//! - `user_account` - Role assignment
//! - `setting` - Store settings
//! - `admin_session` - Tower-sessions storage
//!
//! Every write that reads before it writes (stock adjustments, status
//! changes) locks the row with `FOR UPDATE` inside a transaction.

pub mod banners;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use banners::BannerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint or state violation (duplicate SKU, stale stock count,
    /// forbidden status change).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique violation to [`RepositoryError::Conflict`] and a foreign key
/// violation to [`RepositoryError::NotFound`].
pub(crate) fn map_constraint(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// The back office has few concurrent users, so the pool is small.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
