// ==========================================
// Transfer Model - 读取 API
// ==========================================
// 职责: 四个视图查询 + 查询缓存
// 缓存策略:
// - fetch_totals: 不缓存（始终最新）
// - fetch_sites / fetch_material_summary: TTL 缓存，进程内共享
// - fetch_rows_for_site: 不缓存（写操作后立即查看）
// 失败: 直接返回错误，不重试
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use crate::api::error::{ApiError, ApiResult};
use crate::api::query_cache::{QueryCache, QueryKey};
use crate::domain::{MaterialSummaryRow, Site, SiteRow, Totals};
use crate::i18n::t;
use crate::repository::TransferStore;

pub struct ReadApi {
    store: Arc<dyn TransferStore>,
    cache: Arc<QueryCache>,
    ttl: Duration,
}

impl ReadApi {
    /// 创建读取 API
    ///
    /// # 参数
    /// - store: 数据源
    /// - cache: 查询缓存（由调用方持有并显式传入）
    /// - ttl: 站点列表 / 物料汇总缓存时长
    pub fn new(store: Arc<dyn TransferStore>, cache: Arc<QueryCache>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 总体 KPI（始终最新）
    pub async fn fetch_totals(&self) -> ApiResult<Totals> {
        Ok(self.store.fetch_totals().await?)
    }

    /// 站点列表（按名称排序，TTL 缓存）
    pub async fn fetch_sites(&self) -> ApiResult<Arc<Vec<Site>>> {
        let store = self.store.clone();
        self.cache
            .get_or_compute(QueryKey::Sites, self.ttl, || async move {
                let sites = store.fetch_sites().await?;
                Ok::<_, ApiError>(Arc::new(sites))
            })
            .await
    }

    /// 物料汇总（按 Facility / Material Stream / Load Name 排序，TTL 缓存）
    pub async fn fetch_material_summary(&self) -> ApiResult<Arc<Vec<MaterialSummaryRow>>> {
        let store = self.store.clone();
        self.cache
            .get_or_compute(QueryKey::MaterialSummary, self.ttl, || async move {
                let rows = store.fetch_material_summary().await?;
                Ok::<_, ApiError>(Arc::new(rows))
            })
            .await
    }

    /// 单站点明细（始终最新）
    pub async fn fetch_rows_for_site(&self, site_key: &str) -> ApiResult<Vec<SiteRow>> {
        if site_key.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("validation.site_required")));
        }
        Ok(self.store.fetch_rows_for_site(site_key).await?)
    }

    /// 清空全部查询缓存（写操作成功后调用）
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
