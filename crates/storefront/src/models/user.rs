//! Customer accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketstall_core::{Email, Role, UserId};

/// A storefront account.
///
/// The password hash is never part of this struct; it is read separately
/// only when verifying a login.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
