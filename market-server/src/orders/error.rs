//! Order Workflow Errors
//!
//! The expected/recoverable taxonomy reported to callers. Storage failures
//! are carried separately and surface as opaque 500s; everything else maps
//! to a specific rejection.

use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("no items selected for checkout")]
    EmptyCart,

    #[error("shipping address not found")]
    AddressNotFound,

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: String },

    #[error("order cannot be {action} from status {status}")]
    InvalidState {
        status: OrderStatus,
        action: &'static str,
    },

    #[error("no rights over this order")]
    NotOwner,

    #[error("order not found")]
    NotFound,

    #[error("invalid amount: {0}")]
    Amount(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Storage(err.to_string())
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::validation(err.to_string()),
            OrderError::AddressNotFound => AppError::not_found(err.to_string()),
            OrderError::InsufficientStock { .. } => AppError::business_rule(err.to_string()),
            OrderError::InvalidState { .. } => AppError::business_rule(err.to_string()),
            OrderError::NotOwner => AppError::forbidden(err.to_string()),
            OrderError::NotFound => AppError::not_found(err.to_string()),
            OrderError::Amount(_) => AppError::validation(err.to_string()),
            OrderError::Storage(msg) => AppError::database(msg),
        }
    }
}
