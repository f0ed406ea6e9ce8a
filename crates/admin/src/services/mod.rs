//! Back-office services.

pub mod auth;
pub mod uploads;
