// ==========================================
// Transfer Model - 总体 KPI
// ==========================================
// 对齐: rf_overall_totals 视图（单行）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Totals {
    pub current_loads_annual: f64,
    pub delta_loads_annual: f64,
    pub current_hours_annual: f64,
    pub delta_hours_annual: f64,
    pub current_hours_monthly: f64,
    pub delta_hours_monthly: f64,
}
