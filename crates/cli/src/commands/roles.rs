//! Role table inspection.

use std::path::Path;

use marketstall_core::{RoleTable, RoleTableError};

/// Errors from loading a role table.
#[derive(Debug, thiserror::Error)]
pub enum RolesError {
    #[error("Failed to read {0}: {1}")]
    Io(String, std::io::Error),

    #[error(transparent)]
    Table(#[from] RoleTableError),
}

/// Load the table from `file`, or the built-in one.
pub fn load(file: Option<&Path>) -> Result<RoleTable, RolesError> {
    match file {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .map_err(|e| RolesError::Io(path.display().to_string(), e))?;
            Ok(RoleTable::from_yaml(&document)?)
        }
        None => Ok(RoleTable::standard()),
    }
}

/// Print the effective table as YAML. Validates `file` on the way.
pub fn show(file: Option<&Path>) -> Result<(), RolesError> {
    let yaml = load(file)?.to_yaml()?;

    #[allow(clippy::print_stdout)]
    {
        print!("{yaml}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use marketstall_core::{AdminOperation, Role};

    use super::*;

    #[test]
    fn test_load_builtin() {
        assert_eq!(load(None).unwrap(), RoleTable::standard());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "designer: [edit banners, upload files]").unwrap();

        let table = load(Some(file.path())).unwrap();
        assert!(table.allows(Role::Designer, AdminOperation::UploadFiles));
        assert!(!table.allows(Role::Designer, AdminOperation::ViewDashboard));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "customer: [view orders]").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(RolesError::Table(RoleTableError::CustomerGranted))
        ));

        assert!(matches!(
            load(Some(Path::new("/nonexistent/roles.yaml"))),
            Err(RolesError::Io(..))
        ));
    }
}
