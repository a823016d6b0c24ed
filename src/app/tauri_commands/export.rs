use crate::app::export::{material_summary_to_csv, site_rows_to_csv, sites_to_csv};
use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 导出命令（返回 CSV 文本，由前端保存）
// ==========================================

/// 导出站点列表
#[tauri::command(rename_all = "snake_case")]
pub async fn export_sites_csv(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let sites = state.read_api.fetch_sites().await.map_err(map_api_error)?;
    sites_to_csv(&sites).map_err(map_api_error)
}

/// 导出单站点明细
#[tauri::command(rename_all = "snake_case")]
pub async fn export_site_rows_csv(
    state: tauri::State<'_, AppState>,
    site_key: String,
) -> Result<String, String> {
    let rows = state
        .read_api
        .fetch_rows_for_site(&site_key)
        .await
        .map_err(map_api_error)?;
    site_rows_to_csv(&rows).map_err(map_api_error)
}

/// 导出物料汇总
#[tauri::command(rename_all = "snake_case")]
pub async fn export_material_summary_csv(
    state: tauri::State<'_, AppState>,
) -> Result<String, String> {
    let rows = state
        .read_api
        .fetch_material_summary()
        .await
        .map_err(map_api_error)?;
    material_summary_to_csv(&rows).map_err(map_api_error)
}
