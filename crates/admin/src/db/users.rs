//! Staff and customer account operations.

use sqlx::PgPool;

use marketstall_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::StaffUser;

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

/// Repository for account administration.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<StaffUser>, RepositoryError> {
        let user = sqlx::query_as::<_, StaffUser>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.user_account WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// The current role of an account, or `None` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn current_role(&self, id: UserId) -> Result<Option<Role>, RepositoryError> {
        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM shop.user_account WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(role)
    }

    /// Get an account and its password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(StaffUser, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            user: StaffUser,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, Row>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM shop.user_account WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Every account, staff first, then by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<StaffUser>, RepositoryError> {
        let users = sqlx::query_as::<_, StaffUser>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.user_account \
             ORDER BY (role = 'customer'), email"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<StaffUser, RepositoryError> {
        sqlx::query_as::<_, StaffUser>(&format!(
            "UPDATE shop.user_account SET role = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an account. Its carts, reviews and orders go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.user_account WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
