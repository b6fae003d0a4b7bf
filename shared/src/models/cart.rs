//! Cart Model

use serde::{Deserialize, Serialize};

use super::product::ProductStatus;

/// Cart entry, owned by the buyer and consumed by checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub selected: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart entry joined with the live product row (list view and checkout
/// input). Product fields are re-read at query time, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItemWithProduct {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub selected: bool,
    pub product_name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub product_status: ProductStatus,
    pub seller_id: i64,
    pub image_url: Option<String>,
}

/// Add-to-cart payload. Adding a product already in the cart accumulates
/// quantity instead of inserting a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub product_id: i64,
    pub quantity: i64,
}

/// Update-cart-entry payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CartUpdate {
    pub quantity: Option<i64>,
    pub selected: Option<bool>,
}
