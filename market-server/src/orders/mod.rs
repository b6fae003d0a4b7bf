//! Order Workflow Module
//!
//! The one part of the system with real invariants:
//!
//! - **inventory**: atomic stock reserve/release (the only writer of
//!   product stock/sold counters)
//! - **money**: integer-cent arithmetic with decimal conversion at the edges
//! - **workflow**: checkout (cart snapshot → per-seller orders) and the
//!   order status lifecycle with compensation on cancellation
//! - **error**: the expected/recoverable error taxonomy
//!
//! # Flow
//!
//! ```text
//! CheckoutRequest → OrderWorkflow::create_order
//!     ├─ resolve address (immutable shipping snapshot)
//!     ├─ load selected cart entries + current product rows   ┐
//!     ├─ partition by seller                                 │ one
//!     ├─ reserve stock per line (conditional UPDATE)         │ transaction
//!     ├─ insert orders + order_items                         │
//!     └─ delete consumed cart entries                        ┘
//! ```

pub mod error;
pub mod inventory;
pub mod money;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use error::OrderError;
pub use workflow::{OrderWorkflow, can_view};
