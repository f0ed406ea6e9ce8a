//! Staff account management.
//!
//! Staff share `user_account` with customers; the back office refuses any
//! account whose role is `customer`.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distr::Alphanumeric;

use marketstall_core::{Email, Role, UserId};

use super::{ConnectError, connect};

/// Length of generated passwords.
const GENERATED_PASSWORD_LEN: usize = 20;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Errors that can occur while creating staff.
#[derive(Debug, thiserror::Error)]
pub enum StaffError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("{0} is not a staff role")]
    NotStaff(Role),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Name must not be empty")]
    MissingName,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("An account already exists with email: {0}")]
    UserExists(String),

    #[error("Failed to hash password")]
    PasswordHash,
}

/// Validated input for a new staff account.
#[derive(Debug)]
struct NewStaff {
    email: Email,
    name: String,
    role: Role,
}

fn validate(email: &str, name: &str, role: &str) -> Result<NewStaff, StaffError> {
    let role: Role = role
        .parse()
        .map_err(|_| StaffError::InvalidRole(role.to_owned()))?;
    if !role.is_staff() {
        return Err(StaffError::NotStaff(role));
    }
    let email = Email::parse(email).map_err(|_| StaffError::InvalidEmail(email.to_owned()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(StaffError::MissingName);
    }

    Ok(NewStaff {
        email,
        name: name.to_owned(),
        role,
    })
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

fn hash_password(password: &str) -> Result<String, StaffError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StaffError::WeakPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| StaffError::PasswordHash)
}

/// Create a staff account.
///
/// When `password` is `None` a random one is generated and printed once.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: Option<String>,
) -> Result<UserId, StaffError> {
    let staff = validate(email, name, role)?;

    let generated = password.is_none();
    let password = password.unwrap_or_else(generate_password);
    let hash = hash_password(&password)?;

    let pool = connect().await?;

    tracing::info!("Creating staff account: {} ({})", staff.email, staff.role);

    let user_id = sqlx::query_scalar::<_, UserId>(
        r"
        INSERT INTO shop.user_account (email, name, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(&staff.email)
    .bind(&staff.name)
    .bind(&hash)
    .bind(staff.role)
    .fetch_one(&pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            StaffError::UserExists(staff.email.to_string())
        }
        other => StaffError::Database(other),
    })?;

    tracing::info!(
        "Staff account created! ID: {}, Email: {}, Role: {}",
        user_id,
        staff.email,
        staff.role
    );

    if generated {
        #[allow(clippy::print_stdout)]
        {
            println!("Generated password (shown once): {password}");
        }
    }

    Ok(user_id)
}
