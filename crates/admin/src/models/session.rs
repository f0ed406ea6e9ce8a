//! Session-related types.

use serde::{Deserialize, Serialize};

use marketstall_core::{Email, UserId};

use super::StaffUser;

/// Session-stored staff identity.
///
/// The role is deliberately absent: it is re-read from the database on
/// every request so a demotion takes effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    pub id: UserId,
    pub email: Email,
    pub name: String,
}

impl From<&StaffUser> for CurrentStaff {
    fn from(user: &StaffUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the logged-in staff member.
    pub const CURRENT_STAFF: &str = "current_staff";
}
