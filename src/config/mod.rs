// ==========================================
// Transfer Model - 配置层
// ==========================================
// 职责: 解析运行配置（连接串、缓存 TTL、连接池、语言、操作人）
// 来源: 环境变量优先，其次为本地 secrets 文件
// ==========================================

pub mod app_config;
pub mod secrets;

// 重导出核心配置类型
pub use app_config::{env_keys, AppConfig, ConfigError};
pub use secrets::SecretsStore;
