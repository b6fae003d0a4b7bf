//! 认证授权模块
//!
//! 提供会话认证、密码散列和中间件：
//! - [`SessionStore`] - 会话存储抽象（显式过期）
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_admin`] - 管理员检查中间件

pub mod extractor;
pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::{require_admin, require_auth};
pub use password::{hash_password, verify_password};
pub use session::{
    CurrentUser, MemorySessionStore, Session, SessionLookup, SessionStore, new_token,
};

/// 从 Authorization 头提取令牌
pub fn extract_bearer(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}
