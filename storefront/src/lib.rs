//! Aura Storefront - 化妆品店面目录服务
//!
//! # 架构概述
//!
//! - **目录缓存** (`catalog::cache`): 远程目录文档 + 本地一小时缓存
//! - **描述补全** (`catalog::backfill`): 单 worker、按速率限制重试的生成任务
//! - **管理** (`admin`): 草稿、确认发布、API key
//! - **本地库存** (`inventory`): 内置种子目录
//! - **存储** (`store`): 嵌入式 redb 键值存储
//!
//! # 模块结构
//!
//! ```text
//! storefront/src/
//! ├── core/          # 配置、状态
//! ├── catalog/       # 缓存、描述补全
//! ├── admin.rs       # 草稿与发布
//! ├── inventory.rs   # 种子库存
//! ├── store/         # redb 键值存储
//! └── utils/         # 错误、日志、时钟
//! ```

pub mod admin;
pub mod catalog;
pub mod core;
pub mod inventory;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use admin::AdminSession;
pub use catalog::{CatalogCache, DescriptionBackfill, Storefront};
pub use core::{AppState, Config};
pub use inventory::LocalInventory;
pub use store::{KeyValueStore, LocalStore};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{LOG_RETENTION_DAYS, cleanup_old_logs, init_logger_with_file};

/// 设置运行环境: 创建工作目录、初始化日志、清理过期日志
///
/// `.env` 需在 [`Config::from_env`] 之前加载。
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_path()))?;

    match cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS) {
        Ok(0) => {}
        Ok(n) => tracing::info!(deleted = n, "Old log files cleaned up"),
        Err(e) => tracing::warn!("Log cleanup failed: {}", e),
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___   __  ______  ___
   /   | / / / / __ \/   |
  / /| |/ / / / /_/ / /| |
 / ___ / /_/ / _, _/ ___ |
/_/  |_\____/_/ |_/_/  |_|
    "#
    );
}
