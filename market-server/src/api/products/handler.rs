//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Product, ProductCreate, ProductStatus, ProductUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product as product_repo;
use crate::orders::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Query params for the public product list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub keyword: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// GET /api/products - 公开商品列表（仅已上架）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::search_approved(
        &state.pool,
        query.keyword.as_deref(),
        query.limit.clamp(1, 100),
        query.offset.max(0),
    )
    .await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - 公开商品详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product_repo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.status.is_purchasable())
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

fn require_seller(user: &CurrentUser) -> Result<(), AppError> {
    if !user.role.can_sell() {
        return Err(AppError::forbidden("Seller role required"));
    }
    Ok(())
}

/// GET /api/seller/products - 商家自己的商品（全部状态）
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    require_seller(&user)?;
    let products = product_repo::find_by_seller(&state.pool, user.id).await?;
    Ok(Json(products))
}

/// POST /api/seller/products - 新建商品
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    require_seller(&user)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if payload.stock < 0 {
        return Err(AppError::validation("stock must be non-negative"));
    }

    let price_cents = money::to_cents(payload.price)?;
    let status = if payload.draft {
        ProductStatus::Draft
    } else {
        ProductStatus::PendingReview
    };

    let product = product_repo::create(
        &state.pool,
        user.id,
        payload.name.trim(),
        payload.description.as_deref(),
        price_cents,
        payload.stock,
        payload.image_url.as_deref(),
        status,
    )
    .await?;

    tracing::info!(product_id = product.id, seller_id = user.id, "product created");
    Ok(Json(product))
}

/// PUT /api/seller/products/{id} - 更新商品（仅限本人）
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    require_seller(&user)?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(stock) = payload.stock
        && stock < 0
    {
        return Err(AppError::validation("stock must be non-negative"));
    }

    let price_cents = match payload.price {
        Some(price) => Some(money::to_cents(price)?),
        None => None,
    };

    let product = product_repo::update(&state.pool, id, user.id, payload, price_cents).await?;
    Ok(Json(product))
}

/// DELETE /api/seller/products/{id} - 删除商品（有订单引用时拒绝）
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    require_seller(&user)?;
    let removed = product_repo::delete(&state.pool, id, user.id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Product {id} not found")));
    }
    Ok(Json(true))
}

/// POST /api/seller/products/{id}/submit - 草稿/被拒商品提交审核
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    require_seller(&user)?;
    let product = product_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    if product.seller_id != user.id {
        return Err(AppError::forbidden("Not your listing"));
    }

    let changed = product_repo::set_status(
        &state.pool,
        id,
        &[ProductStatus::Draft, ProductStatus::Rejected],
        ProductStatus::PendingReview,
    )
    .await?;
    if !changed {
        return Err(AppError::business_rule(
            "listing cannot be submitted from its current state",
        ));
    }
    Ok(Json(true))
}

/// Query params for the admin review queue
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<ProductStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// GET /api/admin/products - 审核队列（默认待审核）
pub async fn review_queue(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let status = query.status.unwrap_or(ProductStatus::PendingReview);
    let products = product_repo::find_by_status(
        &state.pool,
        status,
        query.limit.clamp(1, 100),
        query.offset.max(0),
    )
    .await?;
    Ok(Json(products))
}

/// POST /api/admin/products/{id}/approve - 审核通过
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    review_transition(&state, id, ProductStatus::Approved).await
}

/// POST /api/admin/products/{id}/reject - 审核驳回
pub async fn reject(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    review_transition(&state, id, ProductStatus::Rejected).await
}

/// POST /api/admin/products/{id}/suspend - 下架已上架商品
pub async fn suspend(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let changed = product_repo::set_status(
        &state.pool,
        id,
        &[ProductStatus::Approved],
        ProductStatus::Suspended,
    )
    .await?;
    if !changed {
        return Err(not_in_state(&state, id, "only live listings can be suspended").await?);
    }
    tracing::info!(product_id = id, "product suspended");
    Ok(Json(true))
}

async fn review_transition(
    state: &ServerState,
    id: i64,
    verdict: ProductStatus,
) -> AppResult<Json<bool>> {
    let changed = product_repo::set_status(
        &state.pool,
        id,
        &[ProductStatus::PendingReview],
        verdict,
    )
    .await?;
    if !changed {
        return Err(not_in_state(state, id, "listing is not awaiting review").await?);
    }
    tracing::info!(product_id = id, verdict = ?verdict, "product reviewed");
    Ok(Json(true))
}

/// A gated status change matched zero rows: distinguish "missing" from
/// "wrong state" for the caller.
async fn not_in_state(state: &ServerState, id: i64, msg: &str) -> Result<AppError, AppError> {
    match product_repo::find_by_id(&state.pool, id).await? {
        Some(_) => Ok(AppError::business_rule(msg)),
        None => Ok(AppError::not_found(format!("Product {id} not found"))),
    }
}
