//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use marketstall_core::{AccessGate, RoleTable, RoleTableError};

use crate::config::AdminConfig;

/// Errors raised while assembling the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read role table {path}: {source}")]
    RoleTableIo {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid role table {path}: {source}")]
    RoleTable {
        path: String,
        source: RoleTableError,
    },
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable; the role table inside the gate is fixed for the life
/// of the process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    gate: AccessGate,
}

impl AppState {
    /// Create the state, loading the role table from
    /// `config.role_table_path` when set.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the role table file cannot be read or is
    /// invalid.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, StateError> {
        let table = match &config.role_table_path {
            Some(path) => {
                let path_display = path.display().to_string();
                let document =
                    std::fs::read_to_string(path).map_err(|source| StateError::RoleTableIo {
                        path: path_display.clone(),
                        source,
                    })?;
                let table = RoleTable::from_yaml(&document).map_err(|source| {
                    StateError::RoleTable {
                        path: path_display.clone(),
                        source,
                    }
                })?;
                tracing::info!(path = %path_display, "Loaded role table");
                table
            }
            None => RoleTable::standard(),
        };

        Ok(Self::with_gate(config, pool, AccessGate::new(table)))
    }

    /// Create the state around an existing gate.
    #[must_use]
    pub fn with_gate(config: AdminConfig, pool: PgPool, gate: AccessGate) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool, gate }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The access gate every permission check goes through.
    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.inner.gate
    }
}
