//! The role → operations table.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Role, RoleParseError};

use super::AdminOperation;

/// Errors raised while building a [`RoleTable`].
#[derive(thiserror::Error, Debug)]
pub enum RoleTableError {
    /// The YAML document could not be parsed.
    #[error("invalid role table document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A role key is not a known role.
    #[error(transparent)]
    UnknownRole(#[from] RoleParseError),

    /// The same role appears twice under different spellings.
    #[error("role {0} is listed more than once")]
    DuplicateRole(Role),

    /// The administrator entry does not grant every operation.
    #[error("administrator must be granted every operation (missing: {missing:?})")]
    AdministratorIncomplete {
        /// Operations absent from the administrator entry.
        missing: Vec<AdminOperation>,
    },

    /// The customer entry grants back-office operations.
    #[error("customer cannot be granted back-office operations")]
    CustomerGranted,
}

/// Immutable mapping from each [`Role`] to the operations it may perform.
///
/// The administrator always holds every operation and customers hold none;
/// both invariants are checked when a table is built, so a `RoleTable` value
/// is always well-formed. Roles missing from a custom table are granted
/// nothing.
///
/// # Example
///
/// ```
/// use marketstall_core::{AdminOperation, Role, RoleTable};
///
/// let table = RoleTable::from_yaml("designer: [edit banner, view banners]").unwrap();
/// assert!(table.allows(Role::Designer, AdminOperation::EditBanners));
/// assert!(!table.allows(Role::StockManager, AdminOperation::EditStock));
/// assert!(table.allows(Role::Administrator, AdminOperation::ManageUsers));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    grants: BTreeMap<Role, BTreeSet<AdminOperation>>,
}

impl RoleTable {
    /// The table the back office ships with.
    #[must_use]
    pub fn standard() -> Self {
        use AdminOperation::{
            EditBanners, EditOrders, EditProducts, EditStock, ModerateReviews, UploadFiles,
            ViewBanners, ViewDashboard, ViewOrders, ViewProducts, ViewStock,
        };

        let grants = [
            (
                Role::StockManager,
                vec![ViewDashboard, ViewProducts, ViewStock, EditStock],
            ),
            (
                Role::PurchaseManager,
                vec![
                    ViewDashboard,
                    ViewProducts,
                    EditProducts,
                    ViewStock,
                    EditStock,
                    UploadFiles,
                ],
            ),
            (
                Role::SalesManager,
                vec![
                    ViewDashboard,
                    ViewProducts,
                    ViewOrders,
                    EditOrders,
                    ModerateReviews,
                ],
            ),
            (
                Role::Designer,
                vec![
                    ViewDashboard,
                    ViewProducts,
                    ViewBanners,
                    EditBanners,
                    UploadFiles,
                ],
            ),
        ];

        let mut table = Self::empty();
        for (role, ops) in grants {
            table.grants.insert(role, ops.into_iter().collect());
        }
        table
    }

    /// Build a table from explicit grants.
    ///
    /// The administrator may be omitted (it is granted everything); if it is
    /// listed it must name every operation.
    ///
    /// # Errors
    ///
    /// Returns [`RoleTableError`] if a role appears twice, the administrator
    /// entry is incomplete, or the customer entry grants anything.
    pub fn from_grants<I>(grants: I) -> Result<Self, RoleTableError>
    where
        I: IntoIterator<Item = (Role, Vec<AdminOperation>)>,
    {
        let mut table = Self::empty();
        let mut seen = BTreeSet::new();

        for (role, ops) in grants {
            if !seen.insert(role) {
                return Err(RoleTableError::DuplicateRole(role));
            }
            let ops: BTreeSet<AdminOperation> = ops.into_iter().collect();

            match role {
                Role::Administrator => {
                    let missing: Vec<AdminOperation> = AdminOperation::ALL
                        .into_iter()
                        .filter(|op| !ops.contains(op))
                        .collect();
                    if !missing.is_empty() {
                        return Err(RoleTableError::AdministratorIncomplete { missing });
                    }
                }
                Role::Customer => {
                    if !ops.is_empty() {
                        return Err(RoleTableError::CustomerGranted);
                    }
                }
                _ => {
                    table.grants.insert(role, ops);
                }
            }
        }

        Ok(table)
    }

    /// Parse a table from YAML: a mapping of role name to a list of
    /// operation names.
    ///
    /// ```yaml
    /// stock_manager: [view_stock, edit_stock]
    /// designer:
    ///   - edit banner
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RoleTableError`] for malformed YAML, unknown role or
    /// operation names, or a table that violates the invariants checked by
    /// [`RoleTable::from_grants`].
    pub fn from_yaml(document: &str) -> Result<Self, RoleTableError> {
        let raw: BTreeMap<String, Vec<AdminOperation>> = serde_yaml::from_str(document)?;

        let grants = raw
            .into_iter()
            .map(|(name, ops)| Ok((name.parse::<Role>()?, ops)))
            .collect::<Result<Vec<_>, RoleTableError>>()?;

        Self::from_grants(grants)
    }

    /// Whether `role` may perform `operation`.
    #[must_use]
    pub fn allows(&self, role: Role, operation: AdminOperation) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|ops| ops.contains(&operation))
    }

    /// Operations granted to `role`, in declaration order.
    pub fn operations(&self, role: Role) -> impl Iterator<Item = AdminOperation> + '_ {
        self.grants.get(&role).into_iter().flatten().copied()
    }

    /// Render the table as YAML in the same shape [`RoleTable::from_yaml`] reads.
    ///
    /// # Errors
    ///
    /// Returns [`RoleTableError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, RoleTableError> {
        let rendered: BTreeMap<&str, Vec<&str>> = Role::ALL
            .into_iter()
            .map(|role| {
                (
                    role.as_str(),
                    self.operations(role).map(|op| op.as_str()).collect(),
                )
            })
            .collect();
        Ok(serde_yaml::to_string(&rendered)?)
    }

    fn empty() -> Self {
        let mut grants: BTreeMap<Role, BTreeSet<AdminOperation>> =
            Role::ALL.into_iter().map(|role| (role, BTreeSet::new())).collect();
        grants.insert(
            Role::Administrator,
            AdminOperation::ALL.into_iter().collect(),
        );
        Self { grants }
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_invariants() {
        let table = RoleTable::standard();
        for op in AdminOperation::ALL {
            assert!(table.allows(Role::Administrator, op), "administrator lacks {op}");
            assert!(!table.allows(Role::Customer, op), "customer has {op}");
        }
    }

    #[test]
    fn test_standard_table_banner_rules() {
        let table = RoleTable::standard();
        assert!(!table.allows(Role::StockManager, AdminOperation::EditBanners));
        assert!(table.allows(Role::Designer, AdminOperation::EditBanners));
        assert!(!table.allows(Role::Designer, AdminOperation::EditStock));
        assert!(table.allows(Role::StockManager, AdminOperation::EditStock));
    }

    #[test]
    fn test_only_administrator_manages_users() {
        let table = RoleTable::standard();
        let managers: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| table.allows(*role, AdminOperation::ManageUsers))
            .collect();
        assert_eq!(managers, vec![Role::Administrator]);
    }

    #[test]
    fn test_from_yaml_missing_roles_get_nothing() {
        let table = RoleTable::from_yaml("designer: [edit banner]").unwrap();
        assert!(table.allows(Role::Designer, AdminOperation::EditBanners));
        assert!(!table.allows(Role::Designer, AdminOperation::ViewBanners));
        assert_eq!(table.operations(Role::SalesManager).count(), 0);
        assert_eq!(
            table.operations(Role::Administrator).count(),
            AdminOperation::ALL.len()
        );
    }

    #[test]
    fn test_from_yaml_rejects_incomplete_administrator() {
        let err = RoleTable::from_yaml("administrator: [view_dashboard]").unwrap_err();
        assert!(matches!(err, RoleTableError::AdministratorIncomplete { .. }));
    }

    #[test]
    fn test_from_yaml_rejects_customer_grants() {
        let err = RoleTable::from_yaml("plain-customer: [view_orders]").unwrap_err();
        assert!(matches!(err, RoleTableError::CustomerGranted));
    }

    #[test]
    fn test_from_yaml_rejects_duplicate_spellings() {
        let err = RoleTable::from_yaml("stock-manager: [view_stock]\nstock_manager: [edit_stock]")
            .unwrap_err();
        assert!(matches!(err, RoleTableError::DuplicateRole(Role::StockManager)));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_names() {
        assert!(matches!(
            RoleTable::from_yaml("owner: [view_stock]").unwrap_err(),
            RoleTableError::UnknownRole(_)
        ));
        assert!(matches!(
            RoleTable::from_yaml("designer: [paint]").unwrap_err(),
            RoleTableError::Yaml(_)
        ));
    }

    #[test]
    fn test_yaml_roundtrip_of_standard_table() {
        let standard = RoleTable::standard();
        let reparsed = RoleTable::from_yaml(&standard.to_yaml().unwrap()).unwrap();
        assert_eq!(reparsed, standard);
    }
}
