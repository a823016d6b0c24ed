use crate::app::state::AppState;
use crate::app::workflow::WorkflowEvent;

use super::common::{emit_frontend_event, map_api_error, DashboardResponse};

// ==========================================
// 转移/重置命令
// ==========================================
// 成功后缓存已清空，返回重渲染后的整页看板

/// 站点间转移物料
#[tauri::command(rename_all = "snake_case")]
pub async fn move_material(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    from_key: String,
    to_key: String,
    amount_mt: f64,
    operator: Option<String>,
) -> Result<String, String> {
    let actor = operator.unwrap_or_else(|| state.operator().to_string());

    let outcome = {
        let mut workflow = state.workflow.lock().await;
        workflow
            .apply(WorkflowEvent::SelectFrom(from_key))
            .map_err(map_api_error)?;
        workflow
            .apply(WorkflowEvent::SelectTo(to_key))
            .map_err(map_api_error)?;
        workflow
            .apply(WorkflowEvent::SetAmount(amount_mt))
            .map_err(map_api_error)?;
        workflow
            .submit_move(&state.transfer_api, &state.read_api, &actor)
            .await
            .map_err(map_api_error)?
    };

    emit_frontend_event(
        &app,
        "sites_changed",
        serde_json::json!({ "sites": [outcome.request.from_key, outcome.request.to_key] }),
    );

    render_response(&state).await
}

/// 重置单站点覆写
#[tauri::command(rename_all = "snake_case")]
pub async fn reset_site(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    site_key: String,
    operator: Option<String>,
) -> Result<String, String> {
    let actor = operator.unwrap_or_else(|| state.operator().to_string());

    state
        .workflow
        .lock()
        .await
        .submit_reset_site(&site_key, &state.transfer_api, &state.read_api, &actor)
        .await
        .map_err(map_api_error)?;

    emit_frontend_event(&app, "sites_changed", serde_json::json!({ "sites": [site_key] }));
    render_response(&state).await
}

/// 重置全部覆写
#[tauri::command(rename_all = "snake_case")]
pub async fn reset_all(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    operator: Option<String>,
) -> Result<String, String> {
    let actor = operator.unwrap_or_else(|| state.operator().to_string());

    state
        .workflow
        .lock()
        .await
        .submit_reset_all(&state.transfer_api, &state.read_api, &actor)
        .await
        .map_err(map_api_error)?;

    emit_frontend_event(&app, "sites_changed", serde_json::json!({ "sites": "ALL" }));
    render_response(&state).await
}

/// 关闭提示
#[tauri::command(rename_all = "snake_case")]
pub async fn dismiss_notice(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let mut workflow = state.workflow.lock().await;
    workflow.dismiss().map_err(map_api_error)?;

    serde_json::to_string(&workflow.snapshot()).map_err(|e| format!("序列化失败: {}", e))
}

/// 最近操作日志
#[tauri::command(rename_all = "snake_case")]
pub async fn list_recent_actions(
    state: tauri::State<'_, AppState>,
    limit: Option<u32>,
) -> Result<String, String> {
    let result = state
        .transfer_api
        .recent_actions(limit.unwrap_or(50))
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

async fn render_response(state: &AppState) -> Result<String, String> {
    let dashboard = state.render(None).await;
    let workflow = state.workflow.lock().await.snapshot();

    serde_json::to_string(&DashboardResponse {
        dashboard,
        workflow,
    })
    .map_err(|e| format!("序列化失败: {}", e))
}
