use crate::app::state::AppState;

use super::common::{map_api_error, DashboardResponse};

// ==========================================
// 看板相关命令
// ==========================================

/// 渲染整页看板
#[tauri::command(rename_all = "snake_case")]
pub async fn get_dashboard(
    state: tauri::State<'_, AppState>,
    selected_site: Option<String>,
) -> Result<String, String> {
    let dashboard = state.render(selected_site.as_deref()).await;
    let workflow = state.workflow.lock().await.snapshot();

    serde_json::to_string(&DashboardResponse {
        dashboard,
        workflow,
    })
    .map_err(|e| format!("序列化失败: {}", e))
}

/// 查询单站点明细（不走缓存）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_site_detail(
    state: tauri::State<'_, AppState>,
    site_key: String,
) -> Result<String, String> {
    let result = state
        .read_api
        .fetch_rows_for_site(&site_key)
        .await
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}
