// ==========================================
// Transfer Model - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// - Postgres 连接池（懒连接）
// - 查询缓存（进程内共享，由 AppState 持有）
// - 本地操作日志（best-effort）
// - 工作流状态机（单会话）
// ==========================================

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{QueryCache, ReadApi, TransferApi};
use crate::app::dashboard::{render_dashboard, DashboardView};
use crate::app::workflow::TransferWorkflow;
use crate::config::AppConfig;
use crate::db::connect_pg_pool;
use crate::repository::{ActionLogRepository, PgTransferStore, TransferStore};

/// 应用状态
///
/// 在Tauri应用中作为全局状态管理；无界面模式下由 main 直接持有
pub struct AppState {
    /// 运行配置
    pub config: AppConfig,

    /// 读取API（带查询缓存）
    pub read_api: Arc<ReadApi>,

    /// 写入API
    pub transfer_api: Arc<TransferApi>,

    /// 转移/重置工作流
    pub workflow: Mutex<TransferWorkflow>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 连接池为懒连接，这里不会访问数据库；必须在 tokio 运行时内调用。
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误（连接串无效等）
    pub fn new(config: AppConfig) -> Result<Self, String> {
        tracing::info!(
            dsn = %config.redacted_dsn(),
            cache_ttl_secs = config.cache_ttl.as_secs(),
            pool_max = config.pool_max_connections,
            "初始化AppState"
        );

        crate::i18n::set_locale(&config.locale);

        let pool = connect_pg_pool(&config).map_err(|e| format!("无法创建连接池: {}", e))?;
        let store: Arc<dyn TransferStore> = Arc::new(PgTransferStore::new(pool));

        // Best-effort: 本地操作日志不可用不阻塞启动
        let action_log_repo = match ActionLogRepository::open(&config.action_log_path) {
            Ok(repo) => Some(Arc::new(repo)),
            Err(e) => {
                tracing::warn!(
                    path = %config.action_log_path.display(),
                    error = %e,
                    "操作日志初始化失败(将继续启动)"
                );
                None
            }
        };

        Ok(Self::with_store(config, store, action_log_repo))
    }

    /// 使用给定数据源组装（测试注入假数据源）
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TransferStore>,
        action_log_repo: Option<Arc<ActionLogRepository>>,
    ) -> Self {
        let cache = Arc::new(QueryCache::new());
        let read_api = Arc::new(ReadApi::new(store.clone(), cache, config.cache_ttl));
        let transfer_api = Arc::new(TransferApi::new(store, action_log_repo));

        tracing::info!("AppState初始化完成");

        Self {
            config,
            read_api,
            transfer_api,
            workflow: Mutex::new(TransferWorkflow::new()),
        }
    }

    /// 操作人
    pub fn operator(&self) -> &str {
        &self.config.operator
    }

    /// 渲染看板，并把站点列表同步给工作流
    pub async fn render(&self, selected_site: Option<&str>) -> DashboardView {
        let view = render_dashboard(&self.read_api, selected_site).await;
        if view.sites.is_ready() {
            self.workflow.lock().await.sync_sites(&view.site_options);
        }
        view
    }
}
