//! Address Repository

use super::{RepoError, RepoResult};
use shared::models::{Address, AddressCreate, AddressUpdate};
use sqlx::SqlitePool;

const ADDRESS_SELECT: &str = "SELECT id, user_id, receiver_name, phone, province, city, \
     district, detail, is_default, created_at FROM addresses";

pub async fn find_all(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Address>> {
    let sql = format!("{ADDRESS_SELECT} WHERE user_id = ? ORDER BY is_default DESC, created_at DESC");
    let rows = sqlx::query_as::<_, Address>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch an address only if it belongs to the given user.
pub async fn find_owned(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<Option<Address>> {
    let sql = format!("{ADDRESS_SELECT} WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, Address>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: AddressCreate) -> RepoResult<Address> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    if data.is_default {
        sqlx::query("UPDATE addresses SET is_default = 0 WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query(
        "INSERT INTO addresses (id, user_id, receiver_name, phone, province, city, district, \
         detail, is_default, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(user_id)
    .bind(&data.receiver_name)
    .bind(&data.phone)
    .bind(&data.province)
    .bind(&data.city)
    .bind(&data.district)
    .bind(&data.detail)
    .bind(data.is_default)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create address".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    data: AddressUpdate,
) -> RepoResult<Address> {
    let rows = sqlx::query(
        "UPDATE addresses SET receiver_name = COALESCE(?1, receiver_name), \
         phone = COALESCE(?2, phone), province = COALESCE(?3, province), \
         city = COALESCE(?4, city), district = COALESCE(?5, district), \
         detail = COALESCE(?6, detail) WHERE id = ?7 AND user_id = ?8",
    )
    .bind(data.receiver_name)
    .bind(data.phone)
    .bind(data.province)
    .bind(data.city)
    .bind(data.district)
    .bind(data.detail)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Address {id} not found")));
    }
    find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM addresses WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Flip the user's default address in one transaction.
pub async fn set_default(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE addresses SET is_default = 0 WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("UPDATE addresses SET is_default = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Address {id} not found")));
    }
    tx.commit().await?;
    Ok(())
}
