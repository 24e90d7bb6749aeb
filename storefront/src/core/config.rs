use std::path::PathBuf;

use aura_client::ClientConfig;
use aura_client::document::{DEFAULT_COLLECTION, DEFAULT_DOCUMENT};
use aura_client::generative::DEFAULT_MODEL;

/// 店面配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (支持 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (store.redb, logs/) |
/// | DOCUMENT_STORE_URL | http://localhost:8080/v1 | 远程文档存储地址 |
/// | DOCUMENT_STORE_TOKEN | - | 文档存储 Bearer token |
/// | CATALOG_COLLECTION | system | 目录文档所在集合 |
/// | CATALOG_DOCUMENT | catalog_manifest | 目录文档 ID |
/// | GENERATIVE_API_URL | https://generativelanguage.googleapis.com/v1beta | 文本生成 API |
/// | GENERATIVE_MODEL | gemini-2.0-flash-lite-001 | 生成模型 |
/// | GEMINI_API_KEY | - | API key (否则读取本地保存的 key) |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/aura GEMINI_API_KEY=... aura generate
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储本地数据库和日志
    pub work_dir: PathBuf,
    pub document_store_url: String,
    pub document_store_token: Option<String>,
    pub catalog_collection: String,
    pub catalog_document: String,
    pub generative_api_url: String,
    pub generative_model: String,
    pub gemini_api_key: Option<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key 查询函数加载配置 (测试用)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            work_dir: non_empty("WORK_DIR")
                .unwrap_or_else(|| "./work_dir".into())
                .into(),
            document_store_url: non_empty("DOCUMENT_STORE_URL")
                .unwrap_or_else(|| "http://localhost:8080/v1".into()),
            document_store_token: non_empty("DOCUMENT_STORE_TOKEN"),
            catalog_collection: non_empty("CATALOG_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            catalog_document: non_empty("CATALOG_DOCUMENT")
                .unwrap_or_else(|| DEFAULT_DOCUMENT.into()),
            generative_api_url: non_empty("GENERATIVE_API_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".into()),
            generative_model: non_empty("GENERATIVE_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.into()),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            request_timeout_ms: non_empty("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: non_empty("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: non_empty("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// 本地 redb 数据库路径
    pub fn store_path(&self) -> PathBuf {
        self.work_dir.join("store.redb")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    /// 文档存储客户端配置
    pub fn document_client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.document_store_url)
            .with_timeout_ms(self.request_timeout_ms);
        match &self.document_store_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    /// 文本生成客户端配置
    pub fn generative_client_config(&self, api_key: impl Into<String>) -> ClientConfig {
        ClientConfig::new(&self.generative_api_url)
            .with_api_key(api_key)
            .with_model(&self.generative_model)
            .with_timeout_ms(self.request_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
