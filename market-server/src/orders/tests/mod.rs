//! Order workflow integration tests
//!
//! Run against a real SQLite file in a tempdir (WAL, migrations applied via
//! [`DbService`]) so the conditional updates and transaction boundaries are
//! exercised exactly as in production.

mod test_checkout;
mod test_transitions;

use sqlx::SqlitePool;
use tempfile::TempDir;

use shared::models::{CheckoutRequest, Role};

use crate::auth::CurrentUser;
use crate::db::DbService;
use crate::db::repository::cart as cart_repo;
use crate::orders::OrderWorkflow;

pub(crate) struct TestEnv {
    // Held so the database file outlives the pool
    _dir: TempDir,
    pub pool: SqlitePool,
    pub workflow: OrderWorkflow,
}

pub(crate) async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();
    let workflow = OrderWorkflow::new(db.pool.clone());
    TestEnv {
        _dir: dir,
        pool: db.pool,
        workflow,
    }
}

pub(crate) fn customer(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        username: format!("user{id}"),
        role: Role::Customer,
    }
}

pub(crate) fn seller(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        username: format!("user{id}"),
        role: Role::Seller,
    }
}

pub(crate) fn admin(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        username: format!("user{id}"),
        role: Role::Admin,
    }
}

pub(crate) async fn seed_user(pool: &SqlitePool, id: i64, role: Role) {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, email, phone, role, status, created_at) \
         VALUES (?1, ?2, 'x', ?3, NULL, ?4, 'ACTIVE', ?5)",
    )
    .bind(id)
    .bind(format!("user{id}"))
    .bind(format!("user{id}@example.com"))
    .bind(role)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
}

pub(crate) async fn seed_product(
    pool: &SqlitePool,
    seller_id: i64,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> i64 {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO products (id, seller_id, name, description, price_cents, stock, sold, \
         status, image_url, created_at, updated_at) \
         VALUES (?1, ?2, ?3, NULL, ?4, ?5, 0, 'APPROVED', NULL, ?6, ?6)",
    )
    .bind(id)
    .bind(seller_id)
    .bind(name)
    .bind(price_cents)
    .bind(stock)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub(crate) async fn seed_address(pool: &SqlitePool, user_id: i64) -> i64 {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO addresses (id, user_id, receiver_name, phone, province, city, district, \
         detail, is_default, created_at) \
         VALUES (?1, ?2, 'Receiver', '13800000000', 'Province', 'City', 'District', 'Street 1', 1, ?3)",
    )
    .bind(id)
    .bind(user_id)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
    id
}

pub(crate) async fn add_cart(pool: &SqlitePool, user_id: i64, product_id: i64, quantity: i64) -> i64 {
    cart_repo::add(pool, user_id, product_id, quantity)
        .await
        .unwrap()
        .id
}

/// Current (stock, sold) counters for a product.
pub(crate) async fn stock_sold(pool: &SqlitePool, product_id: i64) -> (i64, i64) {
    sqlx::query_as("SELECT stock, sold FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub(crate) async fn cart_size(pool: &SqlitePool, user_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

pub(crate) async fn order_count(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

pub(crate) fn checkout(cart_item_ids: Vec<i64>, address_id: i64) -> CheckoutRequest {
    CheckoutRequest {
        cart_item_ids,
        address_id,
        payment_method: Some("SIMULATED".into()),
        remark: None,
    }
}
