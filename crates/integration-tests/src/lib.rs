//! Integration tests for Marketstall.
//!
//! These tests need a disposable `PostgreSQL` database and are ignored by
//! default:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/marketstall_test \
//!     cargo test -p marketstall-integration-tests -- --ignored
//! ```
//!
//! Every fixture uses random emails and SKUs, so tests can share one
//! database and run in parallel.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use uuid::Uuid;

use marketstall_core::{Email, ProductId, Role, UserId, VariantId};

/// Password given to every fixture account.
pub const FIXTURE_PASSWORD: &str = "fixture-password-123";

/// Connect to `DATABASE_URL` and apply migrations.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("apply migrations");
    pool
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Create an account with `role` and return its id and email.
pub async fn create_user(pool: &PgPool, role: Role) -> (UserId, Email) {
    let email = Email::parse(&format!("{}@example.com", unique(role.as_str()))).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(FIXTURE_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO shop.user_account (email, name, password_hash, role) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&email)
    .bind("Fixture")
    .bind(&hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    (id, email)
}

/// Create an active product with one variant holding `stock` units.
pub async fn create_product(pool: &PgPool, stock: i32) -> (ProductId, VariantId) {
    let product_id = sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO shop.product (name, category, price) VALUES ($1, 'women', 25.00) RETURNING id",
    )
    .bind(unique("Product"))
    .fetch_one(pool)
    .await
    .unwrap();

    let variant_id = sqlx::query_scalar::<_, VariantId>(
        "INSERT INTO shop.variant (product_id, sku, stock) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(product_id)
    .bind(unique("SKU"))
    .bind(stock)
    .fetch_one(pool)
    .await
    .unwrap();

    (product_id, variant_id)
}

/// Current stock of a variant.
pub async fn stock_of(pool: &PgPool, variant_id: VariantId) -> i32 {
    sqlx::query_scalar("SELECT stock FROM shop.variant WHERE id = $1")
        .bind(variant_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
