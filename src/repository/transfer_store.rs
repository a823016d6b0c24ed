// ==========================================
// Transfer Model - 转运数据源接口
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 视图读取 + 存储过程调用；数据库为外部黑盒
// ==========================================

use async_trait::async_trait;

use crate::domain::{MaterialSummaryRow, MoveRequest, MoveTotals, Site, SiteRow, Totals};
use crate::repository::error::RepositoryResult;

/// 转运数据源
///
/// 生产实现为 [`PgTransferStore`](super::PgTransferStore)，
/// 读操作与写操作均直接映射到数据库视图/存储过程，不做校验和缓存。
#[async_trait]
pub trait TransferStore: Send + Sync {
    // ===== 读: 视图 =====

    /// rf_overall_totals（单行）
    async fn fetch_totals(&self) -> RepositoryResult<Totals>;

    /// rf_static 按站点聚合，按名称排序
    async fn fetch_sites(&self) -> RepositoryResult<Vec<Site>>;

    /// rf_site_summary_display，按 Facility / Material Stream / Load Name 排序
    async fn fetch_material_summary(&self) -> RepositoryResult<Vec<MaterialSummaryRow>>;

    /// rf_static 单站点明细，按 material_stream / load_name 排序
    async fn fetch_rows_for_site(&self, site_key: &str) -> RepositoryResult<Vec<SiteRow>>;

    // ===== 写: 存储过程 =====

    /// move_material_between_sites(from_key, to_key, delta)
    async fn move_material(&self, request: &MoveRequest) -> RepositoryResult<MoveTotals>;

    /// reset_site_override(site_key) → 受影响行数
    async fn reset_site(&self, site_key: &str) -> RepositoryResult<i64>;

    /// reset_all_overrides() → 受影响行数
    async fn reset_all(&self) -> RepositoryResult<i64>;
}
