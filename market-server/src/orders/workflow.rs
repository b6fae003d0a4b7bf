//! Order Workflow
//!
//! Turns a buyer's selected cart entries into per-seller orders and drives
//! each order through its status lifecycle. All stock-mutating operations
//! (checkout, cancel) run inside a single database transaction and are
//! serialized through an in-process gate, the single-writer pattern; the
//! ledger's conditional updates remain the database-level oversell guarantee
//! even without the gate.

use std::collections::BTreeMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use shared::models::{CartItemWithProduct, CheckoutRequest, Order, OrderStatus, PlacedOrder, Role};

use crate::auth::CurrentUser;
use crate::db::repository::{address as address_repo, cart as cart_repo, order as order_repo};

use super::error::OrderError;
use super::{inventory, money};

/// Order workflow service. Cheap to clone; handlers reach it through
/// [`crate::core::ServerState`].
#[derive(Clone)]
pub struct OrderWorkflow {
    pool: SqlitePool,
    stock_gate: Arc<Mutex<()>>,
}

impl OrderWorkflow {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            stock_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Checkout: convert the buyer's selected cart entries into one order per
    /// seller.
    ///
    /// The whole sequence (loading the cart snapshot, reserving stock,
    /// inserting orders and items, consuming the cart entries) commits as
    /// one transaction. The first failed reservation aborts every partition
    /// and rolls back all earlier reservations; no partial orders commit and
    /// the cart is left untouched.
    pub async fn create_order(
        &self,
        buyer: &CurrentUser,
        req: &CheckoutRequest,
    ) -> Result<Vec<PlacedOrder>, OrderError> {
        if req.cart_item_ids.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // Shipping snapshot is resolved up front; its fields are copied into
        // every created order, not referenced.
        let address = address_repo::find_owned(&self.pool, req.address_id, buyer.id)
            .await
            .map_err(OrderError::from)?
            .ok_or(OrderError::AddressNotFound)?;

        let _guard = self.stock_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let entries =
            cart_repo::find_selected_for_checkout(&mut tx, buyer.id, &req.cart_item_ids).await?;
        if entries.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // Partition by owning seller: one order per seller per checkout.
        let mut partitions: BTreeMap<i64, Vec<&CartItemWithProduct>> = BTreeMap::new();
        for entry in &entries {
            partitions.entry(entry.seller_id).or_default().push(entry);
        }

        let receiver_address = address.full_address();
        let mut placed = Vec::with_capacity(partitions.len());

        for (seller_id, items) in &partitions {
            let mut total_cents: i64 = 0;
            let mut lines = Vec::with_capacity(items.len());

            for item in items {
                inventory::try_reserve(&mut tx, item.product_id, &item.product_name, item.quantity)
                    .await?;
                let line = money::line_total(item.price_cents, item.quantity)?;
                total_cents = money::add_amounts(total_cents, line)?;
                lines.push((*item, line));
            }

            let order_id = shared::util::snowflake_id();
            let order_no = shared::util::order_no();
            order_repo::insert_order(
                &mut tx,
                order_id,
                &order_no,
                buyer.id,
                *seller_id,
                total_cents,
                req.payment_method.as_deref(),
                &address.receiver_name,
                &address.phone,
                &receiver_address,
                req.remark.as_deref(),
            )
            .await?;

            for (item, line) in lines {
                order_repo::insert_item(
                    &mut tx,
                    order_id,
                    item.product_id,
                    &item.product_name,
                    item.image_url.as_deref(),
                    item.price_cents,
                    item.quantity,
                    line,
                )
                .await?;
            }

            placed.push(PlacedOrder {
                order_id,
                order_no,
                seller_id: *seller_id,
                total_amount_cents: total_cents,
            });
        }

        // Consume exactly the entries included in this checkout.
        let consumed: Vec<i64> = entries.iter().map(|e| e.id).collect();
        cart_repo::delete_entries(&mut tx, buyer.id, &consumed).await?;

        tx.commit().await?;

        tracing::info!(
            buyer_id = buyer.id,
            orders = placed.len(),
            items = consumed.len(),
            "checkout committed"
        );
        Ok(placed)
    }

    /// Pay: PENDING_PAYMENT → PENDING_SHIPMENT. Buyer only.
    pub async fn pay(
        &self,
        order_id: i64,
        actor: &CurrentUser,
        pay_type: &str,
    ) -> Result<(), OrderError> {
        let order = self.load(order_id).await?;
        if order.buyer_id != actor.id {
            return Err(OrderError::NotOwner);
        }
        if order.status != OrderStatus::PendingPayment {
            return Err(OrderError::InvalidState {
                status: order.status,
                action: "paid",
            });
        }

        let now = shared::util::now_millis();
        let rows = sqlx::query(
            "UPDATE orders SET status = 'PENDING_SHIPMENT', payment_method = ?1, paid_at = ?2 \
             WHERE id = ?3 AND status = 'PENDING_PAYMENT'",
        )
        .bind(pay_type)
        .bind(now)
        .bind(order_id)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(self.lost_race(order_id, "paid").await?);
        }

        tracing::info!(order_id, pay_type, "order paid");
        Ok(())
    }

    /// Ship: PENDING_SHIPMENT → SHIPPED. Order's seller or admin.
    pub async fn ship(
        &self,
        order_id: i64,
        actor: &CurrentUser,
        tracking_no: &str,
    ) -> Result<(), OrderError> {
        let order = self.load(order_id).await?;
        if !(actor.role.is_admin() || order.seller_id == actor.id) {
            return Err(OrderError::NotOwner);
        }
        if order.status != OrderStatus::PendingShipment {
            return Err(OrderError::InvalidState {
                status: order.status,
                action: "shipped",
            });
        }

        let now = shared::util::now_millis();
        let rows = sqlx::query(
            "UPDATE orders SET status = 'SHIPPED', tracking_no = ?1, shipped_at = ?2 \
             WHERE id = ?3 AND status = 'PENDING_SHIPMENT'",
        )
        .bind(tracking_no)
        .bind(now)
        .bind(order_id)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(self.lost_race(order_id, "shipped").await?);
        }

        tracing::info!(order_id, tracking_no, "order shipped");
        Ok(())
    }

    /// Receive: SHIPPED → COMPLETED. Buyer only; records receive and
    /// completion timestamps.
    pub async fn receive(&self, order_id: i64, actor: &CurrentUser) -> Result<(), OrderError> {
        let order = self.load(order_id).await?;
        if order.buyer_id != actor.id {
            return Err(OrderError::NotOwner);
        }
        if order.status != OrderStatus::Shipped {
            return Err(OrderError::InvalidState {
                status: order.status,
                action: "received",
            });
        }

        let now = shared::util::now_millis();
        let rows = sqlx::query(
            "UPDATE orders SET status = 'COMPLETED', received_at = ?1, completed_at = ?1 \
             WHERE id = ?2 AND status = 'SHIPPED'",
        )
        .bind(now)
        .bind(order_id)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(self.lost_race(order_id, "received").await?);
        }

        tracing::info!(order_id, "order completed");
        Ok(())
    }

    /// Cancel: PENDING_PAYMENT | PENDING_SHIPMENT → CANCELLED. Buyer, the
    /// order's seller, or admin.
    ///
    /// The status flip and the per-item stock release commit together; the
    /// flip is gated on the pre-read status, so a lost race yields
    /// InvalidState and releases nothing, so each reservation is compensated
    /// exactly once.
    pub async fn cancel(&self, order_id: i64, actor: &CurrentUser) -> Result<(), OrderError> {
        let _guard = self.stock_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let order = order_repo::find_by_id_tx(&mut tx, order_id)
            .await
            .map_err(OrderError::from)?
            .ok_or(OrderError::NotFound)?;
        let allowed =
            actor.role.is_admin() || order.buyer_id == actor.id || order.seller_id == actor.id;
        if !allowed {
            return Err(OrderError::NotOwner);
        }
        if !order.status.can_cancel() {
            return Err(OrderError::InvalidState {
                status: order.status,
                action: "cancelled",
            });
        }

        let rows = sqlx::query("UPDATE orders SET status = 'CANCELLED' WHERE id = ?1 AND status = ?2")
            .bind(order_id)
            .bind(order.status)
            .execute(&mut *tx)
            .await?;
        if rows.rows_affected() == 0 {
            drop(tx);
            return Err(self.lost_race(order_id, "cancelled").await?);
        }

        let items = order_repo::items_for_tx(&mut tx, order_id).await?;
        for item in &items {
            inventory::release(&mut tx, item.product_id, item.quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(order_id, items = items.len(), "order cancelled, stock released");
        Ok(())
    }

    async fn load(&self, order_id: i64) -> Result<Order, OrderError> {
        order_repo::find_by_id(&self.pool, order_id)
            .await
            .map_err(OrderError::from)?
            .ok_or(OrderError::NotFound)
    }

    /// A conditional transition matched zero rows: the order moved under us.
    /// Report the fresh status so the caller sees why.
    async fn lost_race(&self, order_id: i64, action: &'static str) -> Result<OrderError, OrderError> {
        let current = self.load(order_id).await?;
        Ok(OrderError::InvalidState {
            status: current.status,
            action,
        })
    }
}

/// May this actor see the order at all? Buyers see their own orders, sellers
/// additionally see orders placed against them, admins see everything.
pub fn can_view(order: &Order, actor: &CurrentUser) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Seller => order.buyer_id == actor.id || order.seller_id == actor.id,
        Role::Customer => order.buyer_id == actor.id,
    }
}
