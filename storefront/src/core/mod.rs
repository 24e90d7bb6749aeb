//! 核心模块 - 配置和应用状态
//!
//! # 模块结构
//!
//! - [`Config`] - 环境变量配置
//! - [`AppState`] - 服务组装

pub mod config;
pub mod state;

pub use config::Config;
pub use state::AppState;
