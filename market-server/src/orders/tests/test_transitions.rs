use super::*;
use crate::db::repository::order as order_repo;
use crate::orders::OrderError;
use shared::models::OrderStatus;

/// Seed one buyer (1), one seller (2), a product, an address, a carted
/// entry, and run checkout. Returns (product_id, order_id).
async fn place_single_order(env: &TestEnv, quantity: i64) -> (i64, i64) {
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let product = seed_product(&env.pool, 2, "Lamp", 1200, 10).await;
    let address = seed_address(&env.pool, 1).await;
    let entry = add_cart(&env.pool, 1, product, quantity).await;
    let placed = env
        .workflow
        .create_order(&customer(1), &checkout(vec![entry], address))
        .await
        .unwrap();
    (product, placed[0].order_id)
}

async fn status_of(env: &TestEnv, order_id: i64) -> OrderStatus {
    order_repo::find_by_id(&env.pool, order_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn full_lifecycle_pay_ship_receive() {
    let env = setup().await;
    let (_, order_id) = place_single_order(&env, 2).await;

    env.workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap();
    let order = order_repo::find_by_id(&env.pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::PendingShipment);
    assert_eq!(order.payment_method.as_deref(), Some("ALIPAY"));
    assert!(order.paid_at.is_some());

    env.workflow
        .ship(order_id, &seller(2), "SF123456")
        .await
        .unwrap();
    let order = order_repo::find_by_id(&env.pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.tracking_no.as_deref(), Some("SF123456"));
    assert!(order.shipped_at.is_some());

    env.workflow.receive(order_id, &customer(1)).await.unwrap();
    let order = order_repo::find_by_id(&env.pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.received_at.is_some());
    assert!(order.completed_at.is_some());
}

#[tokio::test]
async fn ship_before_payment_is_invalid_and_changes_nothing() {
    let env = setup().await;
    let (_, order_id) = place_single_order(&env, 1).await;

    let err = env
        .workflow
        .ship(order_id, &seller(2), "SF1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::PendingPayment,
            ..
        }
    ));
    assert_eq!(status_of(&env, order_id).await, OrderStatus::PendingPayment);
}

#[tokio::test]
async fn transitions_enforce_ownership() {
    let env = setup().await;
    seed_user(&env.pool, 9, shared::models::Role::Customer).await;
    seed_user(&env.pool, 8, shared::models::Role::Seller).await;
    let (_, order_id) = place_single_order(&env, 1).await;

    // Stranger cannot pay, another seller cannot ship
    let err = env
        .workflow
        .pay(order_id, &customer(9), "ALIPAY")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));

    env.workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap();
    let err = env
        .workflow
        .ship(order_id, &seller(8), "SF1")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));

    // Admin may ship on the seller's behalf
    env.workflow.ship(order_id, &admin(99), "SF1").await.unwrap();

    // Only the buyer confirms receipt
    let err = env
        .workflow
        .receive(order_id, &customer(9))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));
    env.workflow.receive(order_id, &customer(1)).await.unwrap();
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    let err = env
        .workflow
        .pay(424242, &customer(1), "ALIPAY")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound));
}

#[tokio::test]
async fn cancel_restores_stock_and_sold_for_every_item() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let p1 = seed_product(&env.pool, 2, "P1", 1000, 10).await;
    let p2 = seed_product(&env.pool, 2, "P2", 500, 10).await;
    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 2).await;
    let c2 = add_cart(&env.pool, 1, p2, 1).await;

    let placed = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1, c2], address))
        .await
        .unwrap();
    let order_id = placed[0].order_id;
    assert_eq!(stock_sold(&env.pool, p1).await, (8, 2));
    assert_eq!(stock_sold(&env.pool, p2).await, (9, 1));

    env.workflow.cancel(order_id, &customer(1)).await.unwrap();

    assert_eq!(status_of(&env, order_id).await, OrderStatus::Cancelled);
    assert_eq!(stock_sold(&env.pool, p1).await, (10, 0));
    assert_eq!(stock_sold(&env.pool, p2).await, (10, 0));
}

#[tokio::test]
async fn cancel_is_allowed_from_pending_shipment_but_not_later() {
    let env = setup().await;
    let (product, order_id) = place_single_order(&env, 2).await;

    env.workflow
        .pay(order_id, &customer(1), "WECHAT")
        .await
        .unwrap();
    env.workflow.cancel(order_id, &customer(1)).await.unwrap();
    assert_eq!(stock_sold(&env.pool, product).await, (10, 0));

    // Second cancel finds a terminal order
    let err = env
        .workflow
        .cancel(order_id, &customer(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::Cancelled,
            ..
        }
    ));
    // Compensation must not run twice
    assert_eq!(stock_sold(&env.pool, product).await, (10, 0));
}

#[tokio::test]
async fn shipped_orders_cannot_be_cancelled() {
    let env = setup().await;
    let (product, order_id) = place_single_order(&env, 1).await;

    env.workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap();
    env.workflow
        .ship(order_id, &seller(2), "SF1")
        .await
        .unwrap();

    let err = env
        .workflow
        .cancel(order_id, &customer(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::Shipped,
            ..
        }
    ));
    assert_eq!(stock_sold(&env.pool, product).await, (9, 1));
}

#[tokio::test]
async fn seller_and_admin_may_cancel_strangers_may_not() {
    let env = setup().await;
    seed_user(&env.pool, 9, shared::models::Role::Customer).await;
    let (product, order_id) = place_single_order(&env, 1).await;

    let err = env
        .workflow
        .cancel(order_id, &customer(9))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));

    // The order's seller cancels; stock comes back
    env.workflow.cancel(order_id, &seller(2)).await.unwrap();
    assert_eq!(stock_sold(&env.pool, product).await, (10, 0));
}

#[tokio::test]
async fn receive_requires_shipped() {
    let env = setup().await;
    let (_, order_id) = place_single_order(&env, 1).await;

    let err = env
        .workflow
        .receive(order_id, &customer(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::PendingPayment,
            ..
        }
    ));

    env.workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap();
    let err = env
        .workflow
        .receive(order_id, &customer(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::PendingShipment,
            ..
        }
    ));
}

#[tokio::test]
async fn double_pay_is_invalid() {
    let env = setup().await;
    let (_, order_id) = place_single_order(&env, 1).await;

    env.workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap();
    let err = env
        .workflow
        .pay(order_id, &customer(1), "ALIPAY")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidState {
            status: OrderStatus::PendingShipment,
            ..
        }
    ));
}
