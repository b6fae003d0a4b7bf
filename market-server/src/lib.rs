//! Market Server - 多商家电商后端
//!
//! # 架构概述
//!
//! 本模块是服务端主入口，提供以下核心功能：
//!
//! - **订单工作流** (`orders`): 结算拆单、库存台账、状态流转
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **认证** (`auth`): 会话令牌 + Argon2 密码散列
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── auth/          # 会话认证、角色
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池 + 仓储)
//! ├── orders/        # 订单工作流 + 库存台账
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, MemorySessionStore, SessionStore};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderWorkflow};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: dotenv + 日志
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}
