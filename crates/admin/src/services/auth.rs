//! Staff login.
//!
//! Customers and staff share `user_account`; only staff roles may sign in
//! here. A customer with a correct password gets the same answer as a wrong
//! password, so the back office never confirms which emails exist.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sqlx::PgPool;
use thiserror::Error;

use marketstall_core::Email;

use crate::db::{RepositoryError, UserRepository};
use crate::models::StaffUser;

/// Errors from staff authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or not a staff account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Database error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authenticates staff against stored Argon2 hashes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify an email/password pair for a staff account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any mismatch, including a
    /// valid customer login.
    pub async fn login(&self, email: &str, password: &str) -> Result<StaffUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.role.is_staff() {
            tracing::info!(user_id = %user.id, "Back-office login refused for customer account");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

/// Check a password against a stored PHC string. A malformed hash never
/// verifies.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    use super::*;

    #[test]
    fn test_verify_password() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"correct horse", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }
}
