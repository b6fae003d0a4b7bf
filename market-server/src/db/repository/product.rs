//! Product Repository
//!
//! CRUD and review-state changes. Reservation accounting lives in the
//! inventory ledger: `update` lets a seller restock (set an absolute stock
//! level) but deliberately has no way to touch `sold`.

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductStatus, ProductUpdate};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, seller_id, name, description, price_cents, stock, \
     sold, status, image_url, created_at, updated_at FROM products";

/// Public browse: approved listings only, newest first, optional keyword.
pub async fn search_approved(
    pool: &SqlitePool,
    keyword: Option<&str>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Product>> {
    let rows = match keyword {
        Some(kw) if !kw.trim().is_empty() => {
            let pattern = format!("%{}%", kw.trim());
            let sql = format!(
                "{PRODUCT_SELECT} WHERE status = 'APPROVED' AND name LIKE ?1 \
                 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
            );
            sqlx::query_as::<_, Product>(&sql)
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        _ => {
            let sql = format!(
                "{PRODUCT_SELECT} WHERE status = 'APPROVED' \
                 ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
            );
            sqlx::query_as::<_, Product>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_seller(pool: &SqlitePool, seller_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE seller_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(seller_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Admin listing, filtered by lifecycle state.
pub async fn find_by_status(
    pool: &SqlitePool,
    status: ProductStatus,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE status = ?1 ORDER BY created_at ASC LIMIT ?2 OFFSET ?3"
    );
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    seller_id: i64,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    stock: i64,
    image_url: Option<&str>,
    status: ProductStatus,
) -> RepoResult<Product> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO products (id, seller_id, name, description, price_cents, stock, sold, \
         status, image_url, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(seller_id)
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .bind(status)
    .bind(image_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Seller update, scoped to the owning seller. `price_cents` arrives already
/// converted from the decimal payload.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    seller_id: i64,
    data: ProductUpdate,
    price_cents: Option<i64>,
) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), \
         description = COALESCE(?2, description), \
         price_cents = COALESCE(?3, price_cents), \
         stock = COALESCE(?4, stock), \
         image_url = COALESCE(?5, image_url), \
         updated_at = ?6 WHERE id = ?7 AND seller_id = ?8",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(price_cents)
    .bind(data.stock)
    .bind(data.image_url)
    .bind(now)
    .bind(id)
    .bind(seller_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete, scoped to the owner. Fails with `Validation` when order
/// lines still reference the product (foreign key).
pub async fn delete(pool: &SqlitePool, id: i64, seller_id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ? AND seller_id = ?")
        .bind(id)
        .bind(seller_id)
        .execute(pool)
        .await;
    match result {
        Ok(r) => Ok(r.rows_affected() > 0),
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
            RepoError::Validation("product has orders and cannot be deleted".into()),
        ),
        Err(e) => Err(e.into()),
    }
}

/// Lifecycle change gated on the expected current state; returns false when
/// the product exists but sits in a different state.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    from: &[ProductStatus],
    to: ProductStatus,
) -> RepoResult<bool> {
    let placeholders = super::in_placeholders(from.len());
    let sql = format!(
        "UPDATE products SET status = ?, updated_at = ? WHERE id = ? AND status IN ({placeholders})"
    );
    let now = shared::util::now_millis();
    let mut query = sqlx::query(&sql).bind(to).bind(now).bind(id);
    for s in from {
        query = query.bind(*s);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected() > 0)
}
