use super::*;
use crate::db::repository::order as order_repo;
use crate::orders::{OrderError, money};
use shared::models::OrderStatus;

#[tokio::test]
async fn multi_seller_cart_yields_one_order_per_seller() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    seed_user(&env.pool, 3, shared::models::Role::Seller).await;

    let p1 = seed_product(&env.pool, 2, "Keyboard", 1000, 10).await;
    let p2 = seed_product(&env.pool, 3, "Mug", 500, 10).await;

    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 2).await;
    let c2 = add_cart(&env.pool, 1, p2, 1).await;

    let buyer = customer(1);
    let placed = env
        .workflow
        .create_order(&buyer, &checkout(vec![c1, c2], address))
        .await
        .unwrap();

    assert_eq!(placed.len(), 2);
    let by_seller = |sid: i64| placed.iter().find(|p| p.seller_id == sid).unwrap();
    assert_eq!(by_seller(2).total_amount_cents, 2000);
    assert_eq!(by_seller(3).total_amount_cents, 500);

    // Each order holds exactly its seller's items, snapshot included
    let o1 = order_repo::find_by_id(&env.pool, by_seller(2).order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(o1.status, OrderStatus::PendingPayment);
    assert_eq!(o1.buyer_id, 1);
    assert_eq!(o1.receiver_name, "Receiver");
    let items1 = order_repo::items_for(&env.pool, o1.id).await.unwrap();
    assert_eq!(items1.len(), 1);
    assert_eq!(items1[0].product_name, "Keyboard");
    assert_eq!(items1[0].quantity, 2);
    assert_eq!(items1[0].total_cents, 2000);

    // Stock debited, cart consumed
    assert_eq!(stock_sold(&env.pool, p1).await, (8, 2));
    assert_eq!(stock_sold(&env.pool, p2).await, (9, 1));
    assert_eq!(cart_size(&env.pool, 1).await, 0);
}

#[tokio::test]
async fn order_total_is_exact_sum_of_line_totals() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;

    // (P1, qty 2, 10.00) + (P2, qty 1, 5.00) == 25.00
    let p1 = seed_product(&env.pool, 2, "P1", 1000, 5).await;
    let p2 = seed_product(&env.pool, 2, "P2", 500, 5).await;
    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 2).await;
    let c2 = add_cart(&env.pool, 1, p2, 1).await;

    let placed = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1, c2], address))
        .await
        .unwrap();

    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].total_amount_cents, 2500);
    assert_eq!(money::from_cents(placed[0].total_amount_cents).to_string(), "25.00");

    let items = order_repo::items_for(&env.pool, placed[0].order_id)
        .await
        .unwrap();
    let sum: i64 = items.iter().map(|i| i.total_cents).sum();
    assert_eq!(sum, placed[0].total_amount_cents);
}

#[tokio::test]
async fn one_short_item_aborts_the_entire_checkout() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    seed_user(&env.pool, 3, shared::models::Role::Seller).await;

    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let p2 = seed_product(&env.pool, 3, "B", 1000, 10).await;
    let p3 = seed_product(&env.pool, 3, "C", 1000, 1).await;

    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 2).await;
    let c2 = add_cart(&env.pool, 1, p2, 1).await;
    let c3 = add_cart(&env.pool, 1, p3, 5).await; // short

    let err = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1, c2, c3], address))
        .await
        .unwrap_err();
    match err {
        OrderError::InsufficientStock { product } => assert_eq!(product, "C"),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // No orders, no stock movement, cart untouched
    assert_eq!(order_count(&env.pool).await, 0);
    assert_eq!(stock_sold(&env.pool, p1).await, (10, 0));
    assert_eq!(stock_sold(&env.pool, p2).await, (10, 0));
    assert_eq!(stock_sold(&env.pool, p3).await, (1, 0));
    assert_eq!(cart_size(&env.pool, 1).await, 3);
}

#[tokio::test]
async fn empty_or_unselected_cart_is_rejected() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let address = seed_address(&env.pool, 1).await;

    let err = env
        .workflow
        .create_order(&customer(1), &checkout(vec![], address))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));

    // Entry exists but is deselected
    let c1 = add_cart(&env.pool, 1, p1, 1).await;
    sqlx::query("UPDATE cart_items SET selected = 0 WHERE id = ?")
        .bind(c1)
        .execute(&env.pool)
        .await
        .unwrap();
    let err = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1], address))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
}

#[tokio::test]
async fn foreign_address_is_rejected() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    seed_user(&env.pool, 4, shared::models::Role::Customer).await;
    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let other_address = seed_address(&env.pool, 4).await;
    let c1 = add_cart(&env.pool, 1, p1, 1).await;

    let err = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1], other_address))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AddressNotFound));
    assert_eq!(order_count(&env.pool).await, 0);
}

#[tokio::test]
async fn only_consumed_entries_leave_the_cart() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let p2 = seed_product(&env.pool, 2, "B", 2000, 10).await;
    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 1).await;
    let _c2 = add_cart(&env.pool, 1, p2, 1).await;

    // Checkout names only the first entry
    env.workflow
        .create_order(&customer(1), &checkout(vec![c1], address))
        .await
        .unwrap();

    assert_eq!(cart_size(&env.pool, 1).await, 1);
    assert_eq!(stock_sold(&env.pool, p2).await, (10, 0));
}

#[tokio::test]
async fn checkout_charges_the_current_price_not_the_cart_era_price() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 2).await;

    // Price changes after the product entered the cart
    sqlx::query("UPDATE products SET price_cents = 1500 WHERE id = ?")
        .bind(p1)
        .execute(&env.pool)
        .await
        .unwrap();

    let placed = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1], address))
        .await
        .unwrap();
    assert_eq!(placed[0].total_amount_cents, 3000);
}

#[tokio::test]
async fn unpurchasable_product_fails_reservation() {
    let env = setup().await;
    seed_user(&env.pool, 1, shared::models::Role::Customer).await;
    seed_user(&env.pool, 2, shared::models::Role::Seller).await;
    let p1 = seed_product(&env.pool, 2, "A", 1000, 10).await;
    let address = seed_address(&env.pool, 1).await;
    let c1 = add_cart(&env.pool, 1, p1, 1).await;

    // Listing is pulled between carting and checkout
    sqlx::query("UPDATE products SET status = 'SUSPENDED' WHERE id = ?")
        .bind(p1)
        .execute(&env.pool)
        .await
        .unwrap();

    let err = env
        .workflow
        .create_order(&customer(1), &checkout(vec![c1], address))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InsufficientStock { .. }));
    assert_eq!(stock_sold(&env.pool, p1).await, (10, 0));
}
