//! User Model
//!
//! 角色是封闭枚举，所有授权判断走穷尽匹配，不做字符串比较

use serde::{Deserialize, Serialize};

/// User role, a closed set; every authorization predicate matches
/// exhaustively so adding a role forces every call site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    Customer,
    Seller,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// May this role own and manage product listings?
    pub fn can_sell(self) -> bool {
        match self {
            Role::Seller | Role::Admin => true,
            Role::Customer => false,
        }
    }

    /// May this role approve / reject / suspend listings?
    pub fn can_review_products(self) -> bool {
        match self {
            Role::Admin => true,
            Role::Customer | Role::Seller => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Seller => "SELLER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AccountStatus {
    Active,
    Disabled,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: i64,
}
