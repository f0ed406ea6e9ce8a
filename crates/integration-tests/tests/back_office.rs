//! Back-office behaviour against a real database.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use marketstall_admin::config::AdminConfig;
use marketstall_admin::db::{BannerRepository, ProductRepository, RepositoryError, UserRepository};
use marketstall_admin::state::AppState;
use marketstall_core::{BannerDraft, PageType, Role, StockAdjustment};
use marketstall_integration_tests::{
    FIXTURE_PASSWORD, create_product, create_user, stock_of, test_pool,
};
use marketstall_storefront::services::banners::BannerService;

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_stock_guard_rejects_stale_counts() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 7).await;
    let products = ProductRepository::new(&pool);

    let updated = products
        .adjust_stock(
            variant,
            StockAdjustment {
                new_quantity: 12,
                expected_previous: Some(7),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.stock, 12);

    let stale = products
        .adjust_stock(
            variant,
            StockAdjustment {
                new_quantity: 3,
                expected_previous: Some(7),
            },
        )
        .await;
    assert!(matches!(stale, Err(RepositoryError::Conflict(_))));
    assert_eq!(stock_of(&pool, variant).await, 12);

    products
        .adjust_stock(
            variant,
            StockAdjustment {
                new_quantity: 0,
                expected_previous: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, variant).await, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_banner_written_by_admin_is_served_by_storefront() {
    let pool = test_pool().await;
    let identifier = format!("promo-{}", uuid::Uuid::new_v4().simple());
    let draft = |title: &str, page_identifier: Option<&str>, sort_order: i32| BannerDraft {
        title: title.to_string(),
        image_path: "/uploads/banner.png".to_string(),
        link_url: None,
        page_type: PageType::Promotion,
        page_identifier: page_identifier.map(str::to_string),
        sort_order,
        start_date: NaiveDate::from_ymd_opt(2030, 6, 1),
        end_date: NaiveDate::from_ymd_opt(2030, 6, 30),
        active: true,
    };

    let banners = BannerRepository::new(&pool);
    let specific = banners.create(&draft("Specific", Some(&identifier), 5)).await.unwrap();
    let wide = banners.create(&draft("Wide", None, 1)).await.unwrap();

    let service = BannerService::new(pool.clone());
    let june = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
    let ours = |shown: Vec<marketstall_core::Banner>| -> Vec<_> {
        shown
            .into_iter()
            .map(|b| b.id)
            .filter(|id| *id == specific.id || *id == wide.id)
            .collect()
    };

    // Specific banners come before page-wide ones.
    let shown = service.for_page(PageType::Promotion, Some(&identifier), june).await;
    assert_eq!(ours(shown), vec![specific.id, wide.id]);

    let shown = service.for_page(PageType::Promotion, Some("other"), june).await;
    assert_eq!(ours(shown), vec![wide.id]);

    let july = NaiveDate::from_ymd_opt(2030, 7, 1).unwrap();
    let shown = service.for_page(PageType::Promotion, Some(&identifier), july).await;
    assert!(ours(shown).is_empty());

    banners.delete(specific.id).await.unwrap();
    banners.delete(wide.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_banner_reads_back_as_written() {
    let pool = test_pool().await;
    let draft = BannerDraft {
        title: "Winter  clearance".to_string(),
        image_path: "/uploads/winter.png".to_string(),
        link_url: None,
        page_type: PageType::Category,
        page_identifier: Some("women".to_string()),
        sort_order: 3,
        start_date: None,
        end_date: NaiveDate::from_ymd_opt(2030, 1, 31),
        active: false,
    };

    let banners = BannerRepository::new(&pool);
    let created = banners.create(&draft).await.unwrap();
    let read = banners.get(created.id).await.unwrap().unwrap();

    assert_eq!(read.title, draft.title);
    assert_eq!(read.image_path, draft.image_path);
    assert_eq!(read.link_url, None);
    assert_eq!(read.page_type, draft.page_type);
    assert_eq!(read.page_identifier, draft.page_identifier);
    assert_eq!(read.sort_order, draft.sort_order);
    assert_eq!(read.start_date, None);
    assert_eq!(read.end_date, draft.end_date);
    assert_eq!(read.active, draft.active);

    banners.delete(created.id).await.unwrap();
}

fn admin_app(pool: sqlx::PgPool) -> Router {
    let config = AdminConfig {
        database_url: SecretString::from(String::new()),
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        session_secret: SecretString::from("Vw8tR2nQ5xLk9pJm3HsB7cYf4GdZ6aEu".to_string()),
        upload_dir: std::env::temp_dir().join("marketstall-test-uploads"),
        role_table_path: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    };
    marketstall_admin::app(AppState::new(config, pool).unwrap())
}

async fn login(app: &Router, email: &str) -> (StatusCode, Option<String>) {
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": email, "password": FIXTURE_PASSWORD }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    (response.status(), cookie)
}

async fn get(app: &Router, uri: &str, cookie: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_customers_cannot_log_in_to_back_office() {
    let pool = test_pool().await;
    let (_, email) = create_user(&pool, Role::Customer).await;
    let app = admin_app(pool);

    let (status, _) = login(&app, email.as_str()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_role_changes_apply_on_next_request() {
    let pool = test_pool().await;
    let (user, email) = create_user(&pool, Role::Designer).await;
    let app = admin_app(pool.clone());

    let (status, cookie) = login(&app, email.as_str()).await;
    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.unwrap();

    let (status, me) = get(&app, "/api/auth/me", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        me["permissions"]
            .as_array()
            .unwrap()
            .contains(&json!("edit_banners"))
    );

    let (status, _) = get(&app, "/api/banners", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, "/api/stock/low", &cookie).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));

    let users = UserRepository::new(&pool);
    users.set_role(user, Role::StockManager).await.unwrap();
    let (status, _) = get(&app, "/api/banners", &cookie).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(&app, "/api/stock/low", &cookie).await;
    assert_eq!(status, StatusCode::OK);

    users.set_role(user, Role::Customer).await.unwrap();
    let (status, _) = get(&app, "/api/dashboard", &cookie).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    users.delete(user).await.unwrap();
    let (status, _) = get(&app, "/api/dashboard", &cookie).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
