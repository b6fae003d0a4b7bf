//! Health API
//!
//! Liveness plus a database ping.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            "down"
        }
    };
    Ok(Json(HealthResponse {
        status: "ok",
        database,
    }))
}
