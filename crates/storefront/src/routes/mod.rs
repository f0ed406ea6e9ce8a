//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (rate limited)
//! POST   /api/auth/register                 - Create a customer account
//! POST   /api/auth/login                    - Password login
//! POST   /api/auth/logout                   - Logout
//! GET    /api/auth/me                       - Current customer
//!
//! # Catalogue
//! GET    /api/products                      - Active products, filtered and paged
//! GET    /api/products/{id}                 - Product with variants and rating
//! GET    /api/products/{id}/reviews         - Reviews for a product
//! POST   /api/products/{id}/reviews         - Post a review (auth)
//! GET    /api/categories                    - Category tree
//! GET    /api/banners                       - Banners for a page
//!
//! # Cart (auth)
//! GET    /api/cart                          - Cart with totals
//! POST   /api/cart/items                    - Add a variant
//! PATCH  /api/cart/items/{variant_id}       - Set quantity (0 removes)
//! DELETE /api/cart/items/{variant_id}       - Remove a line
//!
//! # Checkout (auth)
//! POST   /api/checkout                      - Place order, open payment session
//! GET    /api/checkout/success?order_id=    - Provider redirect after payment
//! GET    /api/checkout/cancel?order_id=     - Provider redirect after abandoning
//!
//! # Orders (auth)
//! GET    /api/orders                        - Own orders
//! GET    /api/orders/{id}                   - Own order with lines
//! ```

pub mod auth;
pub mod banners;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::Router;

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router().layer(auth_rate_limiter()))
        .merge(products::router())
        .merge(reviews::router())
        .merge(banners::router())
        .merge(
            Router::new()
                .merge(cart::router())
                .merge(checkout::router())
                .layer(api_rate_limiter()),
        )
        .merge(orders::router())
}
