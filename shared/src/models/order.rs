//! Order Model
//!
//! 订单主表 + 订单商品快照。状态机见 [`OrderStatus`]

use serde::{Deserialize, Serialize};

/// Order status state machine:
///
/// ```text
/// PENDING_PAYMENT ──pay──▶ PENDING_SHIPMENT ──ship──▶ SHIPPED ──receive──▶ COMPLETED
///        │                        │
///        └────────cancel──────────┴──▶ CANCELLED
/// ```
///
/// Cancellation is only reachable from the two pre-shipment states; both
/// terminal states accept no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    PendingPayment,
    PendingShipment,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Cancellation window: before the seller has shipped.
    pub fn can_cancel(self) -> bool {
        matches!(
            self,
            OrderStatus::PendingPayment | OrderStatus::PendingShipment
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::PendingShipment => "PENDING_SHIPMENT",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity: one order per seller per checkout. Receiver fields are an
/// immutable snapshot of the shipping address at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub total_amount_cents: i64,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub remark: Option<String>,
    pub tracking_no: Option<String>,
    pub created_at: i64,
    pub paid_at: Option<i64>,
    pub shipped_at: Option<i64>,
    pub received_at: Option<i64>,
    pub completed_at: Option<i64>,
}

/// Order line: denormalized snapshot of the product at purchase time,
/// decoupled from later product edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
    pub total_cents: i64,
    pub created_at: i64,
}

/// Checkout payload: which cart entries to buy, where to ship them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub cart_item_ids: Vec<i64>,
    pub address_id: i64,
    pub payment_method: Option<String>,
    pub remark: Option<String>,
}

/// One created order, as reported back from checkout (a multi-seller cart
/// yields several of these).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: i64,
    pub order_no: String,
    pub seller_id: i64,
    pub total_amount_cents: i64,
}

/// Pay payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRequest {
    pub pay_type: String,
}

/// Ship payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipRequest {
    pub tracking_no: String,
}

/// Order with its lines, for detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_window_is_pre_shipment_only() {
        assert!(OrderStatus::PendingPayment.can_cancel());
        assert!(OrderStatus::PendingShipment.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }
}
