//! Cart Repository

use super::{RepoError, RepoResult, in_placeholders};
use shared::models::{CartItem, CartItemWithProduct, CartUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const CART_WITH_PRODUCT_SELECT: &str = "SELECT ci.id, ci.user_id, ci.product_id, ci.quantity, \
     ci.selected, p.name AS product_name, p.price_cents, p.stock, \
     p.status AS product_status, p.seller_id, p.image_url \
     FROM cart_items ci JOIN products p ON ci.product_id = p.id";

pub async fn find_all(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartItemWithProduct>> {
    let sql = format!("{CART_WITH_PRODUCT_SELECT} WHERE ci.user_id = ? ORDER BY ci.created_at DESC");
    let rows = sqlx::query_as::<_, CartItemWithProduct>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Upsert: adding a product already in the cart accumulates its quantity.
pub async fn add(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<CartItem> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO cart_items (id, user_id, product_id, quantity, selected, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5) \
         ON CONFLICT (user_id, product_id) \
         DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, CartItem>(
        "SELECT id, user_id, product_id, quantity, selected, created_at, updated_at \
         FROM cart_items WHERE user_id = ? AND product_id = ?",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to add cart item".into()))
}

/// Update quantity and/or selected flag, scoped to the owner.
pub async fn update(pool: &SqlitePool, id: i64, user_id: i64, data: CartUpdate) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE cart_items SET quantity = COALESCE(?1, quantity), \
         selected = COALESCE(?2, selected), updated_at = ?3 \
         WHERE id = ?4 AND user_id = ?5",
    )
    .bind(data.quantity)
    .bind(data.selected)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart item {id} not found")));
    }
    Ok(())
}

pub async fn set_all_selected(pool: &SqlitePool, user_id: i64, selected: bool) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE cart_items SET selected = ?, updated_at = ? WHERE user_id = ?")
        .bind(selected)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn remove(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Load the checkout snapshot inside the checkout transaction: the caller's
/// selected entries among `ids`, joined with the *current* product rows.
pub async fn find_selected_for_checkout(
    conn: &mut SqliteConnection,
    user_id: i64,
    ids: &[i64],
) -> RepoResult<Vec<CartItemWithProduct>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{CART_WITH_PRODUCT_SELECT} WHERE ci.user_id = ? AND ci.selected = 1 AND ci.id IN ({}) \
         ORDER BY ci.id",
        in_placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, CartItemWithProduct>(&sql).bind(user_id);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(conn).await?;
    Ok(rows)
}

/// Delete exactly the consumed entries; runs inside the checkout transaction
/// so a failed checkout never loses cart state.
pub async fn delete_entries(
    conn: &mut SqliteConnection,
    user_id: i64,
    ids: &[i64],
) -> RepoResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let sql = format!(
        "DELETE FROM cart_items WHERE user_id = ? AND id IN ({})",
        in_placeholders(ids.len())
    );
    let mut query = sqlx::query(&sql).bind(user_id);
    for id in ids {
        query = query.bind(*id);
    }
    query.execute(conn).await?;
    Ok(())
}
