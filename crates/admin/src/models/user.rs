//! Accounts as seen by the back office.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketstall_core::{Email, Role, UserId};

/// Any account, customer or staff.
///
/// The password hash is read separately and only while verifying a login.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
