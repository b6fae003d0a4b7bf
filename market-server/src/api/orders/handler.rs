//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{
    CheckoutRequest, Order, OrderDetail, OrderStatus, PayRequest, PlacedOrder, ShipRequest,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::orders::can_view;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Query params for order lists
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// POST /api/orders - 结算选中的购物车条目，按商家拆单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Vec<PlacedOrder>>> {
    validate_optional_text(&payload.remark, "remark", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;

    let placed = state.orders.create_order(&user, &payload).await?;
    Ok(Json(placed))
}

/// GET /api/orders - 买家订单列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo::find_by_buyer(
        &state.pool,
        user.id,
        query.status,
        query.limit.clamp(1, 100),
        query.offset.max(0),
    )
    .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情（买家 / 对应商家 / 管理员）
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    if !can_view(&order, &user) {
        return Err(AppError::forbidden("No rights over this order"));
    }
    let items = order_repo::items_for(&state.pool, id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// POST /api/orders/{id}/pay - 支付（模拟）
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PayRequest>,
) -> AppResult<Json<bool>> {
    validate_required_text(&payload.pay_type, "pay_type", MAX_SHORT_TEXT_LEN)?;
    state.orders.pay(id, &user, &payload.pay_type).await?;
    Ok(Json(true))
}

/// POST /api/orders/{id}/receive - 确认收货
pub async fn receive(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.orders.receive(id, &user).await?;
    Ok(Json(true))
}

/// POST /api/orders/{id}/cancel - 取消订单（回补库存）
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.orders.cancel(id, &user).await?;
    Ok(Json(true))
}

/// GET /api/seller/orders - 商家订单列表
pub async fn seller_list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    if !user.role.can_sell() {
        return Err(AppError::forbidden("Seller role required"));
    }
    let orders = order_repo::find_by_seller(
        &state.pool,
        user.id,
        query.status,
        query.limit.clamp(1, 100),
        query.offset.max(0),
    )
    .await?;
    Ok(Json(orders))
}

/// POST /api/seller/orders/{id}/ship - 发货
pub async fn ship(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ShipRequest>,
) -> AppResult<Json<bool>> {
    validate_required_text(&payload.tracking_no, "tracking_no", MAX_SHORT_TEXT_LEN)?;
    state.orders.ship(id, &user, &payload.tracking_no).await?;
    Ok(Json(true))
}

/// GET /api/admin/orders - 全部订单
pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo::find_all(
        &state.pool,
        query.status,
        query.limit.clamp(1, 100),
        query.offset.max(0),
    )
    .await?;
    Ok(Json(orders))
}
