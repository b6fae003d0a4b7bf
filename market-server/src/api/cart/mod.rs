//! Cart API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Cart router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::add))
        .route("/count", get(handler::count))
        .route("/select-all", post(handler::select_all))
        .route("/{id}", put(handler::update).delete(handler::remove))
}
