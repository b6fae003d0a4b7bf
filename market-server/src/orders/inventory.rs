//! Inventory Ledger
//!
//! The only code allowed to write product stock/sold counters. Both
//! operations are single conditional UPDATEs, so the check and the mutation
//! cannot be split by a concurrent writer: two overlapping checkouts can
//! never both pass a stock check that only one of them can satisfy.

use sqlx::SqliteConnection;

use super::error::OrderError;

/// Reserve `quantity` units of a product: decrement stock and increment sold
/// iff the product is purchasable and has enough stock. Zero rows affected
/// means the reservation failed and nothing changed.
pub async fn try_reserve(
    conn: &mut SqliteConnection,
    product_id: i64,
    product_name: &str,
    quantity: i64,
) -> Result<(), OrderError> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE products SET stock = stock - ?1, sold = sold + ?1, updated_at = ?2 \
         WHERE id = ?3 AND status = 'APPROVED' AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(OrderError::InsufficientStock {
            product: product_name.to_string(),
        });
    }
    Ok(())
}

/// Compensation for a prior successful [`try_reserve`]: restore stock and
/// roll back sold. The caller guarantees at most one release per reserved
/// order (cancellation is gated on a one-way status flip).
pub async fn release(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> Result<(), OrderError> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE products SET stock = stock + ?1, sold = sold - ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(conn)
    .await?;
    Ok(())
}
