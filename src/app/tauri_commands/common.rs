use crate::api::error::ApiError;
use crate::app::dashboard::DashboardView;
use crate::app::workflow::WorkflowSnapshot;
use serde::{Deserialize, Serialize};
use tauri::Manager;

// ==========================================
// 公共工具：错误映射、响应结构、事件发送
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.code().to_string(),
        message: err.to_string(),
        details: match &err {
            ApiError::ProcedureRejected {
                code: Some(sqlstate),
                ..
            } => Some(serde_json::json!({ "sqlstate": sqlstate })),
            ApiError::InvalidStateTransition { from, event } => {
                Some(serde_json::json!({ "from": from, "event": event }))
            }
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 看板 + 工作流（每次命令后整页重渲染）
#[derive(Debug, Clone, Serialize)]
pub(super) struct DashboardResponse {
    pub dashboard: DashboardView,
    pub workflow: WorkflowSnapshot,
}

/// best-effort: 通知前端，发送失败不影响命令结果
pub(super) fn emit_frontend_event(app: &tauri::AppHandle, event: &str, payload: serde_json::Value) {
    if let Err(e) = app.emit_all(event, payload) {
        tracing::warn!("emit_all failed: event={}, error={}", event, e);
    }
}
