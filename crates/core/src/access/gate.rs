//! The access gate.

use std::sync::Arc;

use crate::types::Role;

use super::{AdminOperation, RoleTable};

/// A denied permission check.
///
/// Deliberately carries nothing that could be echoed back to a caller; the
/// HTTP layer turns it into a fixed "Forbidden" response.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("forbidden")]
pub struct AccessDenied;

/// Decides whether a role may perform a back-office operation.
///
/// Holds an immutable [`RoleTable`] behind an `Arc`, so cloning the gate into
/// each request is cheap and every clone sees the same table.
///
/// # Example
///
/// ```
/// use marketstall_core::{AccessGate, AdminOperation, Role, RoleTable};
///
/// let gate = AccessGate::new(RoleTable::standard());
/// assert!(gate.can_perform(Role::Designer, AdminOperation::EditBanners));
/// assert!(!gate.can_perform(Role::StockManager, AdminOperation::EditBanners));
/// assert!(!gate.can_perform_named("owner", "edit banner"));
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    table: Arc<RoleTable>,
}

impl AccessGate {
    /// Create a gate over `table`.
    #[must_use]
    pub fn new(table: RoleTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Whether `role` may perform `operation`.
    #[must_use]
    pub fn can_perform(&self, role: Role, operation: AdminOperation) -> bool {
        self.table.allows(role, operation)
    }

    /// String-keyed variant of [`AccessGate::can_perform`].
    ///
    /// An unrecognised role or operation name is always denied.
    #[must_use]
    pub fn can_perform_named(&self, role: &str, operation: &str) -> bool {
        match (role.parse::<Role>(), operation.parse::<AdminOperation>()) {
            (Ok(role), Ok(operation)) => self.can_perform(role, operation),
            _ => false,
        }
    }

    /// Like [`AccessGate::can_perform`], but as a `Result` for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] if the role lacks the operation.
    pub fn authorize(&self, role: Role, operation: AdminOperation) -> Result<(), AccessDenied> {
        if self.can_perform(role, operation) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    /// Every operation `role` may perform.
    #[must_use]
    pub fn permitted(&self, role: Role) -> Vec<AdminOperation> {
        self.table.operations(role).collect()
    }

    /// The table this gate decides with.
    #[must_use]
    pub fn table(&self) -> &RoleTable {
        &self.table
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(RoleTable::standard())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_scenarios() {
        let gate = AccessGate::default();
        assert!(!gate.can_perform_named("stock-manager", "edit banner"));
        assert!(gate.can_perform_named("designer", "edit banner"));
        for op in AdminOperation::ALL {
            assert!(gate.can_perform(Role::Administrator, op));
        }
    }

    #[test]
    fn test_unknown_names_are_denied() {
        let gate = AccessGate::default();
        assert!(!gate.can_perform_named("superuser", "view orders"));
        assert!(!gate.can_perform_named("administrator", "launch rockets"));
        assert!(!gate.can_perform_named("", ""));
    }

    #[test]
    fn test_customer_is_denied_everything() {
        let gate = AccessGate::default();
        assert!(gate.permitted(Role::Customer).is_empty());
        for op in AdminOperation::ALL {
            assert_eq!(gate.authorize(Role::Customer, op), Err(AccessDenied));
        }
    }

    #[test]
    fn test_decisions_are_repeatable() {
        let gate = AccessGate::default();
        for role in Role::ALL {
            for op in AdminOperation::ALL {
                assert_eq!(gate.can_perform(role, op), gate.can_perform(role, op));
                assert_eq!(gate.clone().can_perform(role, op), gate.can_perform(role, op));
            }
        }
    }

    #[test]
    fn test_substituted_table() {
        let table = RoleTable::from_yaml("stock_manager: [edit banners]").unwrap();
        let gate = AccessGate::new(table);
        assert!(gate.can_perform(Role::StockManager, AdminOperation::EditBanners));
        assert!(!gate.can_perform(Role::Designer, AdminOperation::EditBanners));
    }
}
