//! Product API Module
//!
//! Three surfaces behind one module: public browsing, seller listing
//! management, and the admin review queue.

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products", public_routes())
        .nest("/api/seller/products", seller_routes())
        .nest("/api/admin/products", admin_routes())
}

fn public_routes() -> Router<ServerState> {
    // 公开商品浏览：无需登录
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}

fn seller_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::remove))
        .route("/{id}/submit", post(handler::submit))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::review_queue))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/suspend", post(handler::suspend))
        .route_layer(axum_middleware::from_fn(require_admin))
}
