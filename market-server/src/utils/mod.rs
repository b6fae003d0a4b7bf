//! Utility Module
//!
//! - [`error`] - 统一错误类型和响应结构
//! - [`logger`] - tracing 日志初始化
//! - [`validation`] - 输入校验辅助函数

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok};
pub use result::AppResult;
