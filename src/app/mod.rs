// ==========================================
// Transfer Model - 应用层
// ==========================================
// 职责: 看板视图模型、工作流状态机、Tauri 集成
// ==========================================

pub mod dashboard;
pub mod export;
pub mod state;
pub mod tauri_commands;
pub mod workflow;

// 重导出
pub use dashboard::{render_dashboard, DashboardView, KpiCard, MapLayer, SiteOption, Widget};
pub use state::AppState;
pub use workflow::{Notice, TransferWorkflow, WorkflowEvent, WorkflowState};

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
