// ==========================================
// Transfer Model - 操作日志数据仓储
// ==========================================
// 存储: 本地 SQLite transfer_action_log 表
// 红线: 所有转移/重置操作都记录
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
