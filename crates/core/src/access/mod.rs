//! Role-gated access to back-office operations.
//!
//! Three pieces, leaves first:
//!
//! - [`AdminOperation`] - the closed set of actions the back office exposes
//! - [`RoleTable`] - an immutable mapping from [`Role`](crate::Role) to the
//!   operations it may perform, built once at startup
//! - [`AccessGate`] - the single place permission decisions are made
//!
//! Decisions are deny-by-default and never cached: callers look up the
//! account's current role for every request and ask the gate again.

mod gate;
mod operation;
mod table;

pub use gate::{AccessDenied, AccessGate};
pub use operation::{AdminOperation, OperationParseError};
pub use table::{RoleTable, RoleTableError};
