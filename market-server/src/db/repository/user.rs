//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, username, password_hash, email, phone, role, status, created_at FROM users";

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    email: &str,
    phone: Option<&str>,
    role: Role,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, email, phone, role, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'ACTIVE', ?7)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(email)
    .bind(phone)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
