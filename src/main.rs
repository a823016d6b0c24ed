// ==========================================
// Transfer Model - 主入口
// ==========================================
// 默认构建: 渲染一次看板，输出 JSON 后退出
// tauri-app 特性: 启动桌面应用
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(
    all(not(debug_assertions), feature = "tauri-app"),
    windows_subsystem = "windows"
)]

use std::process::ExitCode;

use transfer_model::app::AppState;
use transfer_model::config::{AppConfig, ConfigError};
use transfer_model::i18n::t_with_args;
use transfer_model::logging;

/// 加载配置；失败时返回面向用户的提示
fn load_config() -> Result<AppConfig, String> {
    AppConfig::from_env().map_err(|e| match e {
        ConfigError::MissingConnectionString { secrets_path } => t_with_args(
            "config.missing_dsn",
            &[("path", &secrets_path)],
        ),
        other => other.to_string(),
    })
}

#[cfg(feature = "tauri-app")]
fn main() -> ExitCode {
    use transfer_model::app::tauri_commands::*;

    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 站点物料转移看板", transfer_model::APP_NAME);
    tracing::info!("系统版本: {}", transfer_model::VERSION);
    tracing::info!("==================================================");

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    // 连接池需在运行时上下文中创建
    tracing::info!("正在初始化AppState...");
    let app_state = match tauri::async_runtime::block_on(async move { AppState::new(config) }) {
        Ok(state) => state,
        Err(message) => {
            eprintln!("无法初始化AppState: {}", message);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("启动Tauri应用...");

    let result = tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 看板
            // ==========================================
            get_dashboard,
            get_site_detail,

            // ==========================================
            // 转移 / 重置
            // ==========================================
            move_material,
            reset_site,
            reset_all,
            dismiss_notice,
            list_recent_actions,

            // ==========================================
            // 导出 / 设置
            // ==========================================
            export_sites_csv,
            export_site_rows_csv,
            export_material_summary_csv,
            set_locale,
        ])
        .run(tauri::generate_context!());

    match result {
        Ok(()) => {
            tracing::info!("Tauri应用已退出");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("启动Tauri应用失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tauri-app"))]
#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("{} v{}", transfer_model::APP_NAME, transfer_model::VERSION);

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(message) => {
            eprintln!("无法初始化AppState: {}", message);
            return ExitCode::FAILURE;
        }
    };

    // 可选参数: 要展开明细的 site_key
    let selected_site = std::env::args().nth(1);
    let view = state.render(selected_site.as_deref()).await;

    match serde_json::to_string_pretty(&view) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("序列化失败: {}", e);
            ExitCode::FAILURE
        }
    }
}
