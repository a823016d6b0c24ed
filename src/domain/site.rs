// ==========================================
// Transfer Model - 站点领域模型
// ==========================================
// 来源: rf_static 视图
// 红线: 本层不计算聚合，所有数值以数据库为准
// ==========================================

use serde::{Deserialize, Serialize};

/// 数值比较容差（视图中的 float8 值）
pub const VALUE_EPSILON: f64 = 1e-6;

// ==========================================
// Site - 站点（按 site_key/name/address 聚合）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Site {
    pub site_key: String,
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub row_count: i64,

    // ===== 车次 / 工时 =====
    pub baseline_loads: f64,
    pub current_loads: f64,
    pub baseline_transfer_hours: f64,
    pub current_transfer_hours: f64,

    // ===== 站点属性 =====
    pub road_restrictions: Option<String>,
    pub mt_total: f64, // 生效吨位（有覆写取覆写）
    pub round_trip_hours: Option<f64>,
}

impl Site {
    /// 地图/下拉框展示标签
    pub fn label(&self) -> String {
        format!("{} — {}", self.name, self.address)
    }

    /// 坐标（两者都存在时）
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn delta_loads(&self) -> f64 {
        self.current_loads - self.baseline_loads
    }

    pub fn delta_transfer_hours(&self) -> f64 {
        self.current_transfer_hours - self.baseline_transfer_hours
    }
}

// ==========================================
// SiteRow - 站点明细（每个 load / material_stream 一行）
// ==========================================
// 对齐: rf_static 列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SiteRow {
    pub site_key: String,
    pub from_facility: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub road_restrictions: Option<String>,

    // ===== 吨位 =====
    pub mt_total: Option<f64>,          // 基线
    pub mt_total_override: Option<f64>, // 覆写

    pub round_trip_hours: Option<f64>,

    // ===== 车次 =====
    pub baseline_num_loads: Option<f64>,
    pub current_num_loads: Option<f64>,
    pub delta_num_loads: Option<f64>,

    // ===== 转运工时 =====
    pub baseline_transfer_hours_yr: Option<f64>,
    pub current_transfer_hours_yr: Option<f64>,
    pub delta_transfer_hours_yr: Option<f64>,

    pub material_stream: Option<String>,
    pub load_name: Option<String>,
}

impl SiteRow {
    /// 当前生效吨位
    pub fn current_mt(&self) -> Option<f64> {
        self.mt_total_override.or(self.mt_total)
    }

    pub fn has_override(&self) -> bool {
        self.mt_total_override.is_some()
    }

    /// 是否已回到基线（无覆写，且各 current_* 与 baseline_* 相等）
    pub fn is_at_baseline(&self) -> bool {
        !self.has_override()
            && approx_eq_opt(self.current_num_loads, self.baseline_num_loads)
            && approx_eq_opt(
                self.current_transfer_hours_yr,
                self.baseline_transfer_hours_yr,
            )
    }
}

fn approx_eq_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() <= VALUE_EPSILON,
        (None, None) => true,
        _ => false,
    }
}
