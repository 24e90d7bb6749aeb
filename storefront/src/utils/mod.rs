//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`Clock`] - 可注入的时钟
//! - 日志初始化与清理

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
pub use time::{Clock, ManualClock, SystemClock};
