// ==========================================
// Transfer Model - 操作日志领域模型
// ==========================================
// 红线: 所有写入型操作（转移/重置）都记录
// 存储: 本地 SQLite transfer_action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use super::transfer::{MoveOutcome, ResetOutcome, ResetScope};

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,        // 日志ID (UUID v4)
    pub action_type: ActionType,  // 操作类型
    pub action_ts: NaiveDateTime, // 操作时间戳 (UTC)
    pub actor: String,            // 操作人

    pub site_key: Option<String>, // 主要关联站点（转出站点/被重置站点）

    // ===== 负载 =====
    pub payload_json: Option<JsonValue>, // 请求参数
    pub result_json: Option<JsonValue>,  // 过程返回值

    pub detail: Option<String>, // 详细描述
}

impl ActionLog {
    /// 由转移结果构造日志
    pub fn for_move(actor: &str, outcome: &MoveOutcome) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: ActionType::MoveMaterial,
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            site_key: Some(outcome.request.from_key.clone()),
            payload_json: serde_json::to_value(&outcome.request).ok(),
            result_json: serde_json::to_value(outcome.totals).ok(),
            detail: Some(format!(
                "{} -> {}: {} MT",
                outcome.request.from_key, outcome.request.to_key, outcome.request.delta_mt
            )),
        }
    }

    /// 由重置结果构造日志
    pub fn for_reset(actor: &str, outcome: &ResetOutcome) -> Self {
        let (action_type, site_key) = match &outcome.scope {
            ResetScope::Site(key) => (ActionType::ResetSite, Some(key.clone())),
            ResetScope::All => (ActionType::ResetAll, None),
        };
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type,
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            site_key,
            payload_json: serde_json::to_value(&outcome.scope).ok(),
            result_json: Some(serde_json::json!({ "rows_reset": outcome.rows_reset })),
            detail: Some(format!("{}: {} rows", outcome.scope, outcome.rows_reset)),
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    MoveMaterial, // 站点间转移物料
    ResetSite,    // 重置单站点覆写
    ResetAll,     // 重置全部覆写
}

impl ActionType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::MoveMaterial => "MOVE_MATERIAL",
            ActionType::ResetSite => "RESET_SITE",
            ActionType::ResetAll => "RESET_ALL",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MOVE_MATERIAL" => Some(ActionType::MoveMaterial),
            "RESET_SITE" => Some(ActionType::ResetSite),
            "RESET_ALL" => Some(ActionType::ResetAll),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
