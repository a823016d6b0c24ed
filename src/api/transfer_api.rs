// ==========================================
// Transfer Model - 写入 API
// ==========================================
// 职责: 调用转移/重置存储过程，返回过程产出的行
// 红线:
// - 本层不做输入校验（由工作流在调用前完成），过程错误原样上抛
// - 操作日志为 best-effort，写日志失败不影响操作结果
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::{ActionLog, MoveOutcome, MoveRequest, ResetOutcome, ResetScope};
use crate::repository::{ActionLogRepository, TransferStore};

pub struct TransferApi {
    store: Arc<dyn TransferStore>,
    /// 本地操作日志（不可用时为 None）
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl TransferApi {
    pub fn new(
        store: Arc<dyn TransferStore>,
        action_log_repo: Option<Arc<ActionLogRepository>>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
        }
    }

    /// 站点间转移物料
    ///
    /// # 返回
    /// - Ok(MoveOutcome): 过程返回的转出/转入站点前后吨位
    /// - Err(ApiError::ProcedureRejected): 过程拒绝（消息原样）
    pub async fn move_material(&self, request: MoveRequest, actor: &str) -> ApiResult<MoveOutcome> {
        tracing::info!(
            from = %request.from_key,
            to = %request.to_key,
            delta_mt = request.delta_mt,
            actor,
            "执行物料转移"
        );

        let totals = self.store.move_material(&request).await.map_err(|e| {
            tracing::warn!(from = %request.from_key, to = %request.to_key, error = %e, "物料转移失败");
            e
        })?;

        let outcome = MoveOutcome { request, totals };
        if !outcome.is_conserving() {
            tracing::warn!(
                from_before = totals.from_before,
                from_after = totals.from_after,
                to_before = totals.to_before,
                to_after = totals.to_after,
                delta_mt = outcome.request.delta_mt,
                "转移过程返回值不满足质量守恒"
            );
        }

        tracing::info!(
            from_before = totals.from_before,
            from_after = totals.from_after,
            to_before = totals.to_before,
            to_after = totals.to_after,
            "物料转移完成"
        );

        self.record(ActionLog::for_move(actor, &outcome));
        Ok(outcome)
    }

    /// 重置单站点覆写
    pub async fn reset_site(&self, site_key: &str, actor: &str) -> ApiResult<ResetOutcome> {
        tracing::info!(site_key, actor, "重置站点覆写");
        let rows_reset = self.store.reset_site(site_key).await?;

        let outcome = ResetOutcome {
            scope: ResetScope::Site(site_key.to_string()),
            rows_reset,
        };
        tracing::info!(site_key, rows_reset, "站点覆写已重置");

        self.record(ActionLog::for_reset(actor, &outcome));
        Ok(outcome)
    }

    /// 重置全部覆写
    pub async fn reset_all(&self, actor: &str) -> ApiResult<ResetOutcome> {
        tracing::info!(actor, "重置全部覆写");
        let rows_reset = self.store.reset_all().await?;

        let outcome = ResetOutcome {
            scope: ResetScope::All,
            rows_reset,
        };
        tracing::info!(rows_reset, "全部覆写已重置");

        self.record(ActionLog::for_reset(actor, &outcome));
        Ok(outcome)
    }

    /// 最近的操作日志（日志不可用时返回空）
    pub fn recent_actions(&self, limit: u32) -> ApiResult<Vec<ActionLog>> {
        match &self.action_log_repo {
            Some(repo) => Ok(repo.list_recent(limit)?),
            None => Ok(Vec::new()),
        }
    }

    fn record(&self, log: ActionLog) {
        let Some(repo) = &self.action_log_repo else {
            return;
        };
        if let Err(e) = repo.insert(&log) {
            tracing::warn!(action_id = %log.action_id, error = %e, "操作日志写入失败(忽略)");
        }
    }
}
