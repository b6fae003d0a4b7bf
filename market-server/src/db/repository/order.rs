//! Order Repository
//!
//! Reads run against the pool; inserts take a `&mut SqliteConnection` so the
//! workflow can persist an order and its lines as one atomic unit.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, order_no, buyer_id, seller_id, total_amount_cents, \
     status, payment_method, receiver_name, receiver_phone, receiver_address, remark, \
     tracking_no, created_at, paid_at, shipped_at, received_at, completed_at FROM orders";

const ORDER_ITEM_SELECT: &str = "SELECT id, order_id, product_id, product_name, product_image, \
     price_cents, quantity, total_cents, created_at FROM order_items";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_buyer(
    pool: &SqlitePool,
    buyer_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    find_filtered(pool, "buyer_id", buyer_id, status, limit, offset).await
}

pub async fn find_by_seller(
    pool: &SqlitePool,
    seller_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    find_filtered(pool, "seller_id", seller_id, status, limit, offset).await
}

async fn find_filtered(
    pool: &SqlitePool,
    owner_column: &str,
    owner_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            let sql = format!(
                "{ORDER_SELECT} WHERE {owner_column} = ?1 AND status = ?2 \
                 ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(owner_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "{ORDER_SELECT} WHERE {owner_column} = ?1 \
                 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(owner_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

/// Admin view: all orders, optionally filtered by status.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            let sql = format!(
                "{ORDER_SELECT} WHERE status = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC LIMIT ?1 OFFSET ?2");
            sqlx::query_as::<_, Order>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn items_for(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ORDER_ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Same as [`items_for`] but inside a transaction (cancel compensation).
pub async fn items_for_tx(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ORDER_ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_order(
    conn: &mut SqliteConnection,
    id: i64,
    order_no: &str,
    buyer_id: i64,
    seller_id: i64,
    total_amount_cents: i64,
    payment_method: Option<&str>,
    receiver_name: &str,
    receiver_phone: &str,
    receiver_address: &str,
    remark: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO orders (id, order_no, buyer_id, seller_id, total_amount_cents, status, \
         payment_method, receiver_name, receiver_phone, receiver_address, remark, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING_PAYMENT', ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(id)
    .bind(order_no)
    .bind(buyer_id)
    .bind(seller_id)
    .bind(total_amount_cents)
    .bind(payment_method)
    .bind(receiver_name)
    .bind(receiver_phone)
    .bind(receiver_address)
    .bind(remark)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
    product_name: &str,
    product_image: Option<&str>,
    price_cents: i64,
    quantity: i64,
    total_cents: i64,
) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, product_name, product_image, \
         price_cents, quantity, total_cents, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(order_id)
    .bind(product_id)
    .bind(product_name)
    .bind(product_image)
    .bind(price_cents)
    .bind(quantity)
    .bind(total_cents)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}
