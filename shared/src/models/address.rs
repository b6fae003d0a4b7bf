//! Address Model

use serde::{Deserialize, Serialize};

/// Shipping address entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub receiver_name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub is_default: bool,
    pub created_at: i64,
}

impl Address {
    /// Single-line form captured into the order's shipping snapshot.
    pub fn full_address(&self) -> String {
        format!(
            "{} {} {} {}",
            self.province, self.city, self.district, self.detail
        )
    }
}

/// Create address payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCreate {
    pub receiver_name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Update address payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AddressUpdate {
    pub receiver_name: Option<String>,
    pub phone: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub detail: Option<String>,
}
