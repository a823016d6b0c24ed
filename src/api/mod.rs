// ==========================================
// Transfer Model - API 层
// ==========================================
// 职责: 读取（带缓存）、写入（存储过程）、输入校验
// 调用方: 应用层（工作流 / 看板 / Tauri 命令）
// ==========================================

pub mod error;
pub mod query_cache;
pub mod read_api;
pub mod transfer_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use query_cache::{CacheStats, QueryCache, QueryKey};
pub use read_api::ReadApi;
pub use transfer_api::TransferApi;
pub use validator::{validate_move, validate_reset_site};
