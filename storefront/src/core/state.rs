use std::sync::Arc;

use aura_client::{DocumentStoreClient, GenerativeClient};

use crate::admin::AdminSession;
use crate::catalog::{CatalogCache, DescriptionBackfill, Storefront};
use crate::core::Config;
use crate::inventory::LocalInventory;
use crate::store::{KeyValueStore, LocalStore};
use crate::utils::{AppError, AppResult, Clock, SystemClock};

/// 应用状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<LocalStore> | 本地 redb 存储 |
/// | storefront | Storefront | 目录读取 (缓存 + 种子回退) |
/// | admin | AdminSession | 草稿、发布、API key |
///
/// Clone 只复制 Arc，成本很低。
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<LocalStore>,
    pub storefront: Storefront,
    pub admin: AdminSession,
}

impl AppState {
    /// 初始化应用状态
    ///
    /// 打开 `work_dir/store.redb` 并组装所有服务。网络连接在首次请求时建立。
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let store = Arc::new(LocalStore::open(config.store_path())?);
        tracing::info!(path = %config.store_path().display(), "Local store opened");

        let remote = Arc::new(DocumentStoreClient::new(
            &config.document_client_config(),
            &config.catalog_collection,
            &config.catalog_document,
        )?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let kv: Arc<dyn KeyValueStore> = store.clone();

        let catalog = Arc::new(CatalogCache::new(kv.clone(), remote.clone(), clock.clone()));
        let storefront = Storefront::new(catalog.clone(), LocalInventory::new(kv.clone()));
        let admin = AdminSession::new(kv, remote, catalog, clock);

        Ok(Self {
            config: config.clone(),
            store,
            storefront,
            admin,
        })
    }

    /// 文本生成客户端
    ///
    /// API key 优先使用环境变量，其次使用本地保存的 key。
    pub fn generative_client(&self) -> AppResult<GenerativeClient> {
        let api_key = match &self.config.gemini_api_key {
            Some(key) => key.clone(),
            None => self.admin.api_key()?.ok_or_else(|| {
                AppError::config("No API key configured (set GEMINI_API_KEY or run `aura set-key`)")
            })?,
        };

        Ok(GenerativeClient::new(
            &self.config.generative_client_config(api_key),
        )?)
    }

    /// 描述生成器 (单 worker，按速率限制节流)
    pub fn description_backfill(&self) -> AppResult<DescriptionBackfill> {
        Ok(DescriptionBackfill::new(Arc::new(self.generative_client()?)))
    }
}
