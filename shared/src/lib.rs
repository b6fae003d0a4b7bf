//! Shared types for the marketplace backend.
//!
//! Domain models live in [`models`]; the `db` feature adds `sqlx::FromRow`
//! derives so the server crate can map rows directly. Keeping the models
//! here (instead of inside the server) keeps payload shapes reusable by
//! tooling and integration tests without dragging in the HTTP stack.

pub mod models;
pub mod util;

pub use models::{
    AccountStatus, Address, AddressCreate, AddressUpdate, CartAdd, CartItem, CartItemWithProduct,
    CartUpdate, CheckoutRequest, Order, OrderDetail, OrderItem, OrderStatus, PayRequest,
    PlacedOrder, Product, ProductCreate, ProductStatus, ProductUpdate, Role, ShipRequest, User,
};
