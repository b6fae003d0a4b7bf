//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shared::models::{CartAdd, CartItem, CartItemWithProduct, CartUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{cart as cart_repo, product as product_repo};
use crate::orders::money::MAX_QUANTITY;
use crate::utils::{AppError, AppResult};

fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation("quantity must be positive"));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY})"
        )));
    }
    Ok(())
}

/// GET /api/cart - 购物车列表（附实时商品信息）
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CartItemWithProduct>>> {
    let items = cart_repo::find_all(&state.pool, user.id).await?;
    Ok(Json(items))
}

/// POST /api/cart - 加入购物车（同商品累加数量）
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartAdd>,
) -> AppResult<Json<CartItem>> {
    validate_quantity(payload.quantity)?;

    let product = product_repo::find_by_id(&state.pool, payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", payload.product_id)))?;
    if !product.status.is_purchasable() {
        return Err(AppError::business_rule("product is not available"));
    }

    let item = cart_repo::add(&state.pool, user.id, payload.product_id, payload.quantity).await?;
    Ok(Json(item))
}

/// PUT /api/cart/{id} - 修改数量或选中状态
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CartUpdate>,
) -> AppResult<Json<bool>> {
    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity)?;
    }
    cart_repo::update(&state.pool, id, user.id, payload).await?;
    Ok(Json(true))
}

/// Select-all payload
#[derive(Debug, Deserialize)]
pub struct SelectAllRequest {
    pub selected: bool,
}

/// POST /api/cart/select-all - 全选 / 全不选
pub async fn select_all(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SelectAllRequest>,
) -> AppResult<Json<bool>> {
    cart_repo::set_all_selected(&state.pool, user.id, payload.selected).await?;
    Ok(Json(true))
}

/// DELETE /api/cart/{id} - 移除购物车条目
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = cart_repo::remove(&state.pool, id, user.id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Cart item {id} not found")));
    }
    Ok(Json(true))
}

/// GET /api/cart/count - 购物车商品总数
pub async fn count(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<i64>> {
    let count = cart_repo::count(&state.pool, user.id).await?;
    Ok(Json(count))
}
