//! Order API Module
//!
//! Buyer checkout and transitions, seller fulfilment, admin oversight. All
//! mutations go through [`crate::orders::OrderWorkflow`].

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", buyer_routes())
        .nest("/api/seller/orders", seller_routes())
        .nest("/api/admin/orders", admin_routes())
}

fn buyer_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/receive", post(handler::receive))
        .route("/{id}/cancel", post(handler::cancel))
}

fn seller_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::seller_list))
        .route("/{id}/ship", post(handler::ship))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::admin_list))
        .route_layer(axum_middleware::from_fn(require_admin))
}
