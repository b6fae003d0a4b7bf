use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{MemorySessionStore, SessionStore};
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderWorkflow;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | sessions | Arc<dyn SessionStore> | 注入的会话存储 |
/// | orders | OrderWorkflow | 订单工作流服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 会话存储 (注入的抽象，与订单工作流完全解耦)
    pub sessions: Arc<dyn SessionStore>,
    /// 订单工作流服务
    pub orders: OrderWorkflow,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据目录
    /// 2. 数据库 (连接池 + 迁移)
    /// 3. 会话存储、订单工作流
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_data_dir()
            .map_err(|e| AppError::internal(format!("Failed to create data directory: {e}")))?;

        let db = DbService::new(&config.database_path()).await?;
        let pool = db.pool;

        let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let orders = OrderWorkflow::new(pool.clone());

        Ok(Self {
            config: config.clone(),
            pool,
            sessions,
            orders,
        })
    }
}
