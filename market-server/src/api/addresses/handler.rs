//! Address API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Address, AddressCreate, AddressUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::address as address_repo;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn validate_create(data: &AddressCreate) -> Result<(), AppError> {
    validate_required_text(&data.receiver_name, "receiver_name", MAX_NAME_LEN)?;
    validate_required_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.province, "province", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.district, "district", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.detail, "detail", MAX_ADDRESS_LEN)?;
    Ok(())
}

/// GET /api/addresses - 收货地址列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = address_repo::find_all(&state.pool, user.id).await?;
    Ok(Json(addresses))
}

/// POST /api/addresses - 新建收货地址
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<Address>> {
    validate_create(&payload)?;
    let address = address_repo::create(&state.pool, user.id, payload).await?;
    Ok(Json(address))
}

/// PUT /api/addresses/{id} - 更新收货地址
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<Address>> {
    if let Some(name) = &payload.receiver_name {
        validate_required_text(name, "receiver_name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(detail) = &payload.detail {
        validate_required_text(detail, "detail", MAX_ADDRESS_LEN)?;
    }
    let address = address_repo::update(&state.pool, id, user.id, payload).await?;
    Ok(Json(address))
}

/// DELETE /api/addresses/{id} - 删除收货地址
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = address_repo::delete(&state.pool, id, user.id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Address {id} not found")));
    }
    Ok(Json(true))
}

/// POST /api/addresses/{id}/default - 设为默认地址
pub async fn set_default(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    address_repo::set_default(&state.pool, id, user.id).await?;
    Ok(Json(true))
}
