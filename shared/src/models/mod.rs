//! Domain Models
//!
//! Plain serde structs mirroring the SQLite schema. The `db` feature adds
//! `sqlx::FromRow` so the server's repositories can `query_as` into them.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use address::{Address, AddressCreate, AddressUpdate};
pub use cart::{CartAdd, CartItem, CartItemWithProduct, CartUpdate};
pub use order::{
    CheckoutRequest, Order, OrderDetail, OrderItem, OrderStatus, PayRequest, PlacedOrder,
    ShipRequest,
};
pub use product::{Product, ProductCreate, ProductStatus, ProductUpdate};
pub use user::{AccountStatus, Role, User};
