// ==========================================
// Transfer Model - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与后端 API
// ==========================================

#![cfg(feature = "tauri-app")]

mod common;
mod dashboard;
mod export;
mod settings;
mod transfer;

pub use dashboard::*;
pub use export::*;
pub use settings::*;
pub use transfer::*;
