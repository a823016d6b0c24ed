// ==========================================
// Transfer Model - 看板视图模型
// ==========================================
// 职责: 把读取 API 的结果组装成前端可直接渲染的部件
// - KPI 卡片（当前值 + 变化量）
// - 站点散点地图（初始视角 + 点 + 提示）
// - 站点下拉选项 / 站点列表 / 物料汇总 / 站点明细
// 约束: 单个部件查询失败只影响该部件，不影响整页
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::ReadApi;
use crate::domain::{MaterialSummaryRow, Site, SiteRow, Totals};
use crate::i18n::t;

/// 地图初始缩放级别
pub const MAP_ZOOM: f64 = 6.0;

/// 散点半径（米）
pub const MAP_POINT_RADIUS_M: f64 = 6000.0;

// ==========================================
// Widget - 部件状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Widget<T> {
    Ready { data: T },
    Failed { code: String, message: String },
}

impl<T> Widget<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Widget::Ready { data },
            Err(e) => Widget::failed(&e),
        }
    }

    pub fn failed(err: &ApiError) -> Self {
        tracing::warn!(code = err.code(), error = %err, "看板部件加载失败");
        Widget::Failed {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Widget::Ready { data } => Some(data),
            Widget::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Widget::Ready { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Widget::Ready { .. } => None,
            Widget::Failed { message, .. } => Some(message.as_str()),
        }
    }
}

// ==========================================
// KPI 卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub delta: f64,
    pub value_text: String, // 1,234.56
    pub delta_text: String, // +12.34
}

impl KpiCard {
    fn new(key: &str, value: f64, delta: f64) -> Self {
        Self {
            key: key.to_string(),
            label: t(&format!("kpi.{}", key)),
            value,
            delta,
            value_text: format_thousands(value, 2),
            delta_text: format_delta(delta),
        }
    }
}

/// 由总体 KPI 生成三张卡片
pub fn build_kpi_cards(totals: &Totals) -> Vec<KpiCard> {
    vec![
        KpiCard::new(
            "annual_loads",
            totals.current_loads_annual,
            totals.delta_loads_annual,
        ),
        KpiCard::new(
            "annual_hours",
            totals.current_hours_annual,
            totals.delta_hours_annual,
        ),
        KpiCard::new(
            "monthly_hours",
            totals.current_hours_monthly,
            totals.delta_hours_monthly,
        ),
    ]
}

// ==========================================
// 地图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitePoint {
    pub site_key: String,
    pub name: String,
    pub address: String,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub row_count: i64,
    pub mt_total: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    /// 无坐标站点时为 None
    pub view_state: Option<MapViewState>,
    pub radius_m: f64,
    pub points: Vec<SitePoint>,
}

/// 构建散点图层（无坐标的站点不上图）
pub fn build_map_layer(sites: &[Site]) -> MapLayer {
    let rows_label = t("map.rows");
    let points: Vec<SitePoint> = sites
        .iter()
        .filter_map(|site| {
            let (lat, lon) = site.position()?;
            Some(SitePoint {
                site_key: site.site_key.clone(),
                name: site.name.clone(),
                address: site.address.clone(),
                label: site.label(),
                lat,
                lon,
                row_count: site.row_count,
                mt_total: site.mt_total,
                tooltip: format!(
                    "{}\n{}\n{}: {}",
                    site.name, site.address, rows_label, site.row_count
                ),
            })
        })
        .collect();

    let view_state = if points.is_empty() {
        None
    } else {
        let n = points.len() as f64;
        Some(MapViewState {
            latitude: points.iter().map(|p| p.lat).sum::<f64>() / n,
            longitude: points.iter().map(|p| p.lon).sum::<f64>() / n,
            zoom: MAP_ZOOM,
        })
    };

    MapLayer {
        view_state,
        radius_m: MAP_POINT_RADIUS_M,
        points,
    }
}

// ==========================================
// 站点选项 / 明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub key: String,
    pub name: String,
    pub label: String,
}

pub fn build_site_options(sites: &[Site]) -> Vec<SiteOption> {
    sites
        .iter()
        .map(|s| SiteOption {
            key: s.site_key.clone(),
            name: s.name.clone(),
            label: s.label(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDetail {
    pub site_key: String,
    pub rows: Vec<SiteRow>,
    pub override_rows: usize,
    pub current_mt: f64,
}

impl SiteDetail {
    pub fn new(site_key: &str, rows: Vec<SiteRow>) -> Self {
        let override_rows = rows.iter().filter(|r| r.has_override()).count();
        let current_mt = rows.iter().filter_map(SiteRow::current_mt).sum();
        Self {
            site_key: site_key.to_string(),
            rows,
            override_rows,
            current_mt,
        }
    }
}

// ==========================================
// DashboardView - 整页视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: Widget<Vec<KpiCard>>,
    pub map: Widget<MapLayer>,
    pub sites: Widget<Vec<Site>>,
    pub site_options: Vec<SiteOption>,
    pub material_summary: Widget<Vec<MaterialSummaryRow>>,
    pub site_detail: Option<Widget<SiteDetail>>,
    pub rendered_at: DateTime<Utc>,
}

/// 渲染整页看板
///
/// KPI / 站点 / 物料汇总 / 明细 并发查询；任何一个失败只标记对应部件。
pub async fn render_dashboard(read_api: &ReadApi, selected_site: Option<&str>) -> DashboardView {
    let selected_site = selected_site.map(str::trim).filter(|s| !s.is_empty());

    let detail_future = async {
        match selected_site {
            Some(key) => Some(
                read_api
                    .fetch_rows_for_site(key)
                    .await
                    .map(|rows| SiteDetail::new(key, rows)),
            ),
            None => None,
        }
    };

    let (totals, sites, summary, detail) = futures::join!(
        read_api.fetch_totals(),
        read_api.fetch_sites(),
        read_api.fetch_material_summary(),
        detail_future,
    );

    let (map, site_options, sites) = match sites {
        Ok(sites) => (
            Widget::Ready {
                data: build_map_layer(&sites),
            },
            build_site_options(&sites),
            Widget::Ready {
                data: Vec::clone(&sites),
            },
        ),
        // 地图与站点列表共用同一查询，失败时两个部件都标记失败
        Err(e) => (Widget::failed(&e), Vec::new(), Widget::failed(&e)),
    };

    DashboardView {
        kpis: Widget::from_result(totals.map(|totals| build_kpi_cards(&totals))),
        map,
        sites,
        site_options,
        material_summary: Widget::from_result(summary.map(|rows| Vec::clone(&rows))),
        site_detail: detail.map(Widget::from_result),
        rendered_at: Utc::now(),
    }
}

// ==========================================
// 数值格式化
// ==========================================

/// 千分位 + 固定小数位: 1234.5 → "1,234.50"
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.00 不显示负号
    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// 带符号变化量: 2 → "+2.00", -1.5 → "-1.50"
pub fn format_delta(value: f64) -> String {
    format!("{:+.2}", value)
}
