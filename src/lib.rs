// ==========================================
// Transfer Model - 核心库
// ==========================================
// 技术栈: Tauri + Rust + PostgreSQL (sqlx) + SQLite 操作日志
// 系统定位: 站点间物料转移的决策支持看板
// 数据库业务逻辑在存储过程中，本库只负责读取、调用与展示
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 环境变量 / 密钥文件
pub mod config;

// 数据库基础设施（连接池 / SQLite PRAGMA）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 读取 / 写入 / 校验 / 缓存
pub mod api;

// 应用层 - 看板视图模型 / 工作流 / Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    ActionLog, ActionType, MaterialSummaryRow, MoveOutcome, MoveRequest, MoveTotals,
    ResetOutcome, ResetScope, Site, SiteRow, Totals,
};

// API
pub use api::{ApiError, QueryCache, ReadApi, TransferApi};

// 应用
pub use app::{AppState, DashboardView, TransferWorkflow, WorkflowState};

// 配置
pub use config::{AppConfig, ConfigError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Transfer Model";
