// ==========================================
// Transfer Model - 领域模型层
// ==========================================
// 职责: 定义视图/过程返回行、转移与重置请求、操作日志
// 红线: 不含数据访问逻辑，不复算数据库聚合
// ==========================================

pub mod action_log;
pub mod site;
pub mod summary;
pub mod totals;
pub mod transfer;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use site::{Site, SiteRow};
pub use summary::MaterialSummaryRow;
pub use totals::Totals;
pub use transfer::{MoveOutcome, MoveRequest, MoveTotals, ResetOutcome, ResetScope};
