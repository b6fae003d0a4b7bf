//! Address API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Address router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/addresses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::remove))
        .route("/{id}/default", post(handler::set_default))
}
