//! Checkout reserves stock atomically and cancellation returns it.

#![allow(clippy::unwrap_used)]

use marketstall_core::{Money, OrderStatus, Role};
use marketstall_integration_tests::{create_product, create_user, stock_of, test_pool};
use marketstall_storefront::db::cart::{LineChange, MAX_LINE_QUANTITY};
use marketstall_storefront::db::{CartRepository, OrderRepository, RepositoryError};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_checkouts_never_oversell() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 1).await;

    let mut customers = Vec::new();
    for _ in 0..5 {
        let (user, _) = create_user(&pool, Role::Customer).await;
        CartRepository::new(&pool).add(user, variant, 1).await.unwrap();
        customers.push(user);
    }

    let attempts = customers.into_iter().map(|user| {
        let pool = pool.clone();
        tokio::spawn(async move {
            OrderRepository::new(&pool)
                .place(user, "1 Test Street", Money::ZERO)
                .await
        })
    });

    let mut placed = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => placed += 1,
            Err(RepositoryError::Conflict(msg)) => assert!(msg.contains("insufficient stock")),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(placed, 1);
    assert_eq!(stock_of(&pool, variant).await, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_refused_checkout_writes_nothing() {
    let pool = test_pool().await;
    let (_, plenty) = create_product(&pool, 10).await;
    let (_, scarce) = create_product(&pool, 1).await;
    let (user, _) = create_user(&pool, Role::Customer).await;

    let cart = CartRepository::new(&pool);
    cart.add(user, plenty, 3).await.unwrap();
    cart.add(user, scarce, 2).await.unwrap();

    let result = OrderRepository::new(&pool)
        .place(user, "1 Test Street", Money::ZERO)
        .await;

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    assert_eq!(stock_of(&pool, plenty).await, 10);
    assert_eq!(stock_of(&pool, scarce).await, 1);
    assert!(
        OrderRepository::new(&pool)
            .list_for_user(user)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_cancel_restocks_once() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 4).await;
    let (user, _) = create_user(&pool, Role::Customer).await;

    CartRepository::new(&pool).add(user, variant, 3).await.unwrap();
    let orders = OrderRepository::new(&pool);
    let order = orders.place(user, "1 Test Street", Money::ZERO).await.unwrap();
    assert_eq!(stock_of(&pool, variant).await, 1);

    let cancelled = orders.cancel_pending(user, order.order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&pool, variant).await, 4);

    // Repeating the cancel is a no-op.
    orders.cancel_pending(user, order.order.id).await.unwrap();
    assert_eq!(stock_of(&pool, variant).await, 4);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_storefront_cannot_cancel_paid_order() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 5).await;
    let (user, _) = create_user(&pool, Role::Customer).await;

    CartRepository::new(&pool).add(user, variant, 2).await.unwrap();
    let orders = OrderRepository::new(&pool);
    let order = orders.place(user, "1 Test Street", Money::ZERO).await.unwrap();
    orders.mark_paid(user, order.order.id).await.unwrap();
    assert_eq!(stock_of(&pool, variant).await, 3);

    let result = orders.cancel_pending(user, order.order.id).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    assert_eq!(stock_of(&pool, variant).await, 3);

    let detail = orders
        .get_for_user(user, order.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.order.status, OrderStatus::Paid);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_paid_order_clears_cart_and_admin_cancel_restocks() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 5).await;
    let (user, _) = create_user(&pool, Role::Customer).await;

    CartRepository::new(&pool).add(user, variant, 2).await.unwrap();
    let orders = OrderRepository::new(&pool);
    let order = orders.place(user, "1 Test Street", Money::ZERO).await.unwrap();
    orders.mark_paid(user, order.order.id).await.unwrap();
    assert!(CartRepository::new(&pool).lines(user).await.unwrap().is_empty());

    let admin_orders = marketstall_admin::db::OrderRepository::new(&pool);
    let detail = admin_orders
        .set_status(order.order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(detail.order.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&pool, variant).await, 5);

    let revived = admin_orders
        .set_status(order.order.id, OrderStatus::Paid)
        .await;
    assert!(matches!(
        revived,
        Err(marketstall_admin::db::RepositoryError::Conflict(_))
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_repeated_adds_stop_at_line_limit() {
    let pool = test_pool().await;
    let (_, variant) = create_product(&pool, 500).await;
    let (user, _) = create_user(&pool, Role::Customer).await;

    let cart = CartRepository::new(&pool);
    let first = MAX_LINE_QUANTITY - 1;
    assert_eq!(cart.add(user, variant, first).await.unwrap(), LineChange::Applied);
    assert_eq!(cart.add(user, variant, 2).await.unwrap(), LineChange::LimitReached);
    assert_eq!(cart.add(user, variant, 1).await.unwrap(), LineChange::Applied);
    assert_eq!(cart.add(user, variant, 1).await.unwrap(), LineChange::LimitReached);

    let lines = cart.lines(user).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().unwrap().quantity, MAX_LINE_QUANTITY);
}
