//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Listing lifecycle. Only `Approved` products can be bought; stock and
/// sold counters are mutated exclusively by the inventory ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProductStatus {
    Draft,
    PendingReview,
    Approved,
    Rejected,
    Suspended,
}

impl ProductStatus {
    pub fn is_purchasable(self) -> bool {
        matches!(self, ProductStatus::Approved)
    }

    /// Review verdicts are only meaningful while the listing sits in the
    /// review queue; suspension only applies to a live listing.
    pub fn can_be_reviewed(self) -> bool {
        matches!(self, ProductStatus::PendingReview)
    }
}

/// Product entity
///
/// Prices are integer cents; `stock`/`sold` are non-negative counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub sold: i64,
    pub status: ProductStatus,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload. `price` is a decimal amount ("129.90"), converted
/// to cents by the server before storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub image_url: Option<String>,
    /// Keep the listing as a draft instead of submitting it for review.
    #[serde(default)]
    pub draft: bool,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}
