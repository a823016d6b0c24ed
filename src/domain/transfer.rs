// ==========================================
// Transfer Model - 转移 / 重置 领域模型
// ==========================================
// 对齐: move_material_between_sites / reset_site_override / reset_all_overrides
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use super::site::VALUE_EPSILON;

// ==========================================
// MoveRequest - 物料转移请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from_key: String,
    pub to_key: String,
    pub delta_mt: f64,
}

impl MoveRequest {
    pub fn new(from_key: impl Into<String>, to_key: impl Into<String>, delta_mt: f64) -> Self {
        Self {
            from_key: from_key.into(),
            to_key: to_key.into(),
            delta_mt,
        }
    }
}

// ==========================================
// MoveTotals - 存储过程返回行
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoveTotals {
    pub from_before: f64,
    pub from_after: f64,
    pub to_before: f64,
    pub to_after: f64,
}

// ==========================================
// MoveOutcome - 转移结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub request: MoveRequest,
    pub totals: MoveTotals,
}

impl MoveOutcome {
    /// 过程返回值是否满足质量守恒
    ///
    /// from_after == from_before - delta 且 to_after == to_before + delta
    pub fn is_conserving(&self) -> bool {
        let delta = self.request.delta_mt;
        let t = &self.totals;
        (t.from_before - delta - t.from_after).abs() <= VALUE_EPSILON
            && (t.to_before + delta - t.to_after).abs() <= VALUE_EPSILON
    }
}

// ==========================================
// ResetScope - 重置范围
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "site_key", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetScope {
    Site(String), // 单站点
    All,          // 全部站点
}

impl fmt::Display for ResetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetScope::Site(key) => write!(f, "SITE({})", key),
            ResetScope::All => write!(f, "ALL"),
        }
    }
}

// ==========================================
// ResetOutcome - 重置结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub scope: ResetScope,
    pub rows_reset: i64,
}
