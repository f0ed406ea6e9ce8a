//! HTTP route handlers for the back office.
//!
//! Every handler except login/logout extracts [`RequireStaff`] and names the
//! operation it performs; the access gate decides.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/login                    - Staff login
//! POST   /api/auth/logout                   - Logout
//! GET    /api/auth/me                       - Current staff member and permissions
//!
//! GET    /api/dashboard                     - view_dashboard
//!
//! # Catalogue
//! GET    /api/products                      - view_products
//! POST   /api/products                      - edit_products
//! GET    /api/products/{id}                 - view_products
//! PUT    /api/products/{id}                 - edit_products
//! DELETE /api/products/{id}                 - edit_products
//! GET    /api/products/{id}/variants        - view_products
//! POST   /api/products/{id}/variants        - edit_products
//! PUT    /api/variants/{id}                 - edit_products
//! DELETE /api/variants/{id}                 - edit_products
//! PUT    /api/variants/{id}/stock           - edit_stock
//! GET    /api/stock/low                     - view_stock
//!
//! # Orders
//! GET    /api/orders?status=                - view_orders
//! GET    /api/orders/{id}                   - view_orders
//! PATCH  /api/orders/{id}/status            - edit_orders
//!
//! # Banners
//! GET    /api/banners                       - view_banners
//! POST   /api/banners                       - edit_banners
//! GET    /api/banners/preview               - view_banners
//! GET    /api/banners/{id}                  - view_banners
//! PUT    /api/banners/{id}                  - edit_banners
//! DELETE /api/banners/{id}                  - edit_banners
//!
//! # Accounts
//! GET    /api/users                         - view_users
//! PATCH  /api/users/{id}/role               - manage_users
//! DELETE /api/users/{id}                    - manage_users
//!
//! GET    /api/reviews                       - moderate_reviews
//! DELETE /api/reviews/{id}                  - moderate_reviews
//!
//! GET    /api/settings                      - view_settings
//! PUT    /api/settings/{key}                - edit_settings
//!
//! POST   /api/uploads                       - upload_files
//! GET    /uploads/*                         - Stored images (public)
//! ```
//!
//! [`RequireStaff`]: crate::middleware::RequireStaff

pub mod auth;
pub mod banners;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes for the back office.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(banners::router())
        .merge(users::router())
        .merge(reviews::router())
        .merge(settings::router())
        .merge(uploads::router())
}
