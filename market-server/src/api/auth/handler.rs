//! Auth API Handlers

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use shared::models::{AccountStatus, Role, User};

use crate::auth::{self, CurrentUser, Session, extract_bearer};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user as user_repo};
use crate::security_log;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, MAX_USERNAME_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Register payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// CUSTOMER (default) or SELLER; admin accounts are provisioned out of band.
    pub role: Option<Role>,
}

/// POST /api/auth/register - 注册账号
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<User>> {
    validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let role = match req.role {
        None => Role::Customer,
        Some(Role::Admin) => {
            return Err(AppError::validation(
                "admin accounts cannot be self-registered",
            ));
        }
        Some(role) => role,
    };

    let password_hash = auth::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = user_repo::create(
        &state.pool,
        req.username.trim(),
        &password_hash,
        req.email.trim(),
        req.phone.as_deref(),
        role,
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::conflict("username or email already registered"),
        other => other.into(),
    })?;

    tracing::info!(user_id = user.id, role = %user.role, "user registered");
    Ok(Json(user))
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the bearer token plus the account it belongs to.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login - 登录，返回会话令牌
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = user_repo::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let verified = auth::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::invalid_credentials());
    }

    if user.status != AccountStatus::Active {
        return Err(AppError::forbidden("Account is disabled"));
    }

    let token = auth::new_token();
    let session = Session {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        expires_at: shared::util::now_millis() + state.config.session_ttl_millis(),
    };
    state.sessions.insert(token.clone(), session).await;

    security_log!("INFO", "login_ok", user_id = user.id, username = user.username.clone());
    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/auth/logout - 注销当前会话
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> AppResult<Json<bool>> {
    if let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer)
    {
        state.sessions.remove(token).await;
    }
    Ok(Json(true))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    let user = user_repo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}
