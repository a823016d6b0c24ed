// ==========================================
// 内存版 TransferStore（集成测试用）
// ==========================================
// 职责:
// - 按视图/存储过程契约模拟 rf_* 视图与三个过程
// - 统计每类查询的执行次数（验证缓存命中）
// - 可注入失败（连接失败 / 过程拒绝）
// - 可挂起站点列表查询（模拟慢查询与并发写入交错）
// ==========================================

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map};
use tokio::sync::Notify;

use transfer_model::domain::{MaterialSummaryRow, MoveRequest, MoveTotals, Site, SiteRow, Totals};
use transfer_model::repository::{RepositoryError, RepositoryResult, TransferStore};

/// 每车吨位（由吨位推算车次）
pub const MT_PER_LOAD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeQuery {
    Totals,
    Sites,
    MaterialSummary,
    RowsForSite,
    MoveMaterial,
    ResetSite,
    ResetAll,
}

#[derive(Debug, Clone)]
pub enum FakeFailure {
    Connection(String),
    Procedure(String),
}

impl FakeFailure {
    fn to_error(&self) -> RepositoryError {
        match self {
            FakeFailure::Connection(msg) => RepositoryError::DatabaseConnectionError(msg.clone()),
            FakeFailure::Procedure(msg) => RepositoryError::ProcedureRejected {
                code: Some("P0001".to_string()),
                message: msg.clone(),
            },
        }
    }
}

/// 站点列表查询闸门
///
/// 查询读完数据后发出 `started`，等待 `release` 才返回。
#[derive(Debug, Clone, Default)]
pub struct QueryGate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// 单站点种子
#[derive(Debug, Clone)]
pub struct SiteSeed {
    pub site_key: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    /// 每个 load 一行，值为基线吨位
    pub loads: Vec<(String, f64)>,
    pub round_trip_hours: f64,
    pub material_stream: String,
}

impl SiteSeed {
    pub fn new(site_key: &str, name: &str, mt: f64) -> Self {
        Self {
            site_key: site_key.to_string(),
            name: name.to_string(),
            address: format!("{} Main St", site_key),
            lat: 45.0,
            lon: -75.0,
            loads: vec![(format!("{}-L1", site_key), mt)],
            round_trip_hours: 2.0,
            material_stream: "Aggregate".to_string(),
        }
    }

    pub fn stream(mut self, material_stream: &str) -> Self {
        self.material_stream = material_stream.to_string();
        self
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    pub fn with_loads(mut self, loads: &[(&str, f64)]) -> Self {
        self.loads = loads.iter().map(|(n, mt)| (n.to_string(), *mt)).collect();
        self
    }
}

pub struct FakeTransferStore {
    rows: Mutex<Vec<SiteRow>>,
    sites: Vec<SiteSeed>,
    calls: Mutex<HashMap<FakeQuery, usize>>,
    failures: Mutex<HashMap<FakeQuery, FakeFailure>>,
    sites_gate: Mutex<Option<QueryGate>>,
    total_calls: AtomicUsize,
}

impl FakeTransferStore {
    pub fn new(seeds: Vec<SiteSeed>) -> Self {
        let rows = seeds
            .iter()
            .flat_map(|seed| {
                seed.loads.iter().map(move |(load_name, mt)| {
                    let mut row = SiteRow {
                        site_key: seed.site_key.clone(),
                        from_facility: seed.name.clone(),
                        address: Some(seed.address.clone()),
                        lat: Some(seed.lat),
                        lon: Some(seed.lon),
                        road_restrictions: None,
                        mt_total: Some(*mt),
                        mt_total_override: None,
                        round_trip_hours: Some(seed.round_trip_hours),
                        baseline_num_loads: Some(mt / MT_PER_LOAD),
                        current_num_loads: None,
                        delta_num_loads: None,
                        baseline_transfer_hours_yr: Some(mt / MT_PER_LOAD * seed.round_trip_hours),
                        current_transfer_hours_yr: None,
                        delta_transfer_hours_yr: None,
                        material_stream: Some(seed.material_stream.clone()),
                        load_name: Some(load_name.clone()),
                    };
                    recompute(&mut row);
                    row
                })
            })
            .collect();

        Self {
            rows: Mutex::new(rows),
            sites: seeds,
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            sites_gate: Mutex::new(None),
            total_calls: AtomicUsize::new(0),
        }
    }

    /// 两站点标准场景: SiteA(100 MT) / SiteB(50 MT)
    pub fn two_sites() -> Self {
        Self::new(vec![
            SiteSeed::new("A", "SiteA", 100.0).at(44.0, -76.0),
            SiteSeed::new("B", "SiteB", 50.0).at(46.0, -74.0),
        ])
    }

    pub fn calls(&self, query: FakeQuery) -> usize {
        self.calls.lock().unwrap().get(&query).copied().unwrap_or(0)
    }

    /// 所有查询/过程调用次数
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, query: FakeQuery, failure: FakeFailure) {
        self.failures.lock().unwrap().insert(query, failure);
    }

    /// 挂起下一次站点列表查询
    pub fn gate_sites(&self) -> QueryGate {
        let gate = QueryGate::default();
        *self.sites_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// 追加一行（同一站点的另一条 load）
    pub fn push_load(&self, site_key: &str, material_stream: &str, load_name: &str, mt: f64) {
        let mut rows = self.rows.lock().unwrap();
        let Some(template) = rows.iter().find(|r| r.site_key == site_key).cloned() else {
            return;
        };
        let mut row = SiteRow {
            mt_total: Some(mt),
            mt_total_override: None,
            baseline_num_loads: Some(mt / MT_PER_LOAD),
            baseline_transfer_hours_yr: Some(
                mt / MT_PER_LOAD * template.round_trip_hours.unwrap_or(0.0),
            ),
            material_stream: Some(material_stream.to_string()),
            load_name: Some(load_name.to_string()),
            ..template
        };
        recompute(&mut row);
        rows.push(row);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// 直接读取某站点当前吨位（不计入调用次数）
    pub fn current_mt(&self, site_key: &str) -> f64 {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.site_key == site_key)
            .filter_map(SiteRow::current_mt)
            .sum()
    }

    fn enter(&self, query: FakeQuery) -> RepositoryResult<()> {
        *self.calls.lock().unwrap().entry(query).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().unwrap().get(&query) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn site_total(rows: &[SiteRow], site_key: &str) -> f64 {
        rows.iter()
            .filter(|r| r.site_key == site_key)
            .filter_map(SiteRow::current_mt)
            .sum()
    }

    fn snapshot_sites(&self) -> Vec<Site> {
        let rows = self.rows.lock().unwrap();

        let mut sites: Vec<Site> = self
            .sites
            .iter()
            .map(|seed| {
                let site_rows: Vec<&SiteRow> =
                    rows.iter().filter(|r| r.site_key == seed.site_key).collect();
                let sum = |f: fn(&SiteRow) -> Option<f64>| {
                    site_rows.iter().filter_map(|r| f(r)).sum::<f64>()
                };
                Site {
                    site_key: seed.site_key.clone(),
                    name: seed.name.clone(),
                    address: seed.address.clone(),
                    lat: Some(seed.lat),
                    lon: Some(seed.lon),
                    row_count: site_rows.len() as i64,
                    baseline_loads: sum(|r| r.baseline_num_loads),
                    current_loads: sum(|r| r.current_num_loads),
                    baseline_transfer_hours: sum(|r| r.baseline_transfer_hours_yr),
                    current_transfer_hours: sum(|r| r.current_transfer_hours_yr),
                    road_restrictions: None,
                    mt_total: sum(SiteRow::current_mt),
                    round_trip_hours: Some(seed.round_trip_hours),
                }
            })
            .collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        sites
    }

    fn fetch_material_summary_rows(&self) -> RepositoryResult<Vec<MaterialSummaryRow>> {
        self.enter(FakeQuery::MaterialSummary)?;
        let rows = self.rows.lock().unwrap();

        // (facility, stream, load) 排序
        let mut grouped: BTreeMap<(String, String, String), f64> = BTreeMap::new();
        for row in rows.iter() {
            let key = (
                row.from_facility.clone(),
                row.material_stream.clone().unwrap_or_default(),
                row.load_name.clone().unwrap_or_default(),
            );
            *grouped.entry(key).or_insert(0.0) += row.current_mt().unwrap_or(0.0);
        }

        Ok(grouped
            .into_iter()
            .map(|((facility, stream, load), mt)| {
                let mut columns = Map::new();
                columns.insert("Facility".to_string(), json!(facility));
                columns.insert("Material Stream".to_string(), json!(stream));
                columns.insert("Load Name".to_string(), json!(load));
                columns.insert("MT".to_string(), json!(format!("{:.2}", mt)));
                MaterialSummaryRow::new(columns)
            })
            .collect())
    }

    fn rejected(message: String) -> RepositoryError {
        RepositoryError::ProcedureRejected {
            code: Some("P0001".to_string()),
            message,
        }
    }
}

/// 按当前吨位重算 current_* / delta_* 列
fn recompute(row: &mut SiteRow) {
    let rt = row.round_trip_hours.unwrap_or(0.0);
    let current_loads = row.current_mt().unwrap_or(0.0) / MT_PER_LOAD;
    let baseline_loads = row.baseline_num_loads.unwrap_or(0.0);
    let baseline_hours = row.baseline_transfer_hours_yr.unwrap_or(0.0);

    row.current_num_loads = Some(current_loads);
    row.delta_num_loads = Some(current_loads - baseline_loads);
    row.current_transfer_hours_yr = Some(current_loads * rt);
    row.delta_transfer_hours_yr = Some(current_loads * rt - baseline_hours);
}

/// 按比例把站点吨位从 before 调整为 after
fn rescale(rows: &mut [SiteRow], site_key: &str, before: f64, after: f64) {
    let mut site_rows: Vec<&mut SiteRow> =
        rows.iter_mut().filter(|r| r.site_key == site_key).collect();
    if before > 0.0 {
        let ratio = after / before;
        for row in site_rows.iter_mut() {
            let current = row.current_mt().unwrap_or(0.0);
            row.mt_total_override = Some(current * ratio);
            recompute(row);
        }
    } else if let Some(first) = site_rows.first_mut() {
        first.mt_total_override = Some(after);
        recompute(first);
    }
}

#[async_trait]
impl TransferStore for FakeTransferStore {
    async fn fetch_totals(&self) -> RepositoryResult<Totals> {
        self.enter(FakeQuery::Totals)?;
        let rows = self.rows.lock().unwrap();
        let sum = |f: fn(&SiteRow) -> Option<f64>| rows.iter().filter_map(f).sum::<f64>();

        let current_hours = sum(|r| r.current_transfer_hours_yr);
        let delta_hours = sum(|r| r.delta_transfer_hours_yr);
        Ok(Totals {
            current_loads_annual: sum(|r| r.current_num_loads),
            delta_loads_annual: sum(|r| r.delta_num_loads),
            current_hours_annual: current_hours,
            delta_hours_annual: delta_hours,
            current_hours_monthly: current_hours / 12.0,
            delta_hours_monthly: delta_hours / 12.0,
        })
    }

    async fn fetch_sites(&self) -> RepositoryResult<Vec<Site>> {
        self.enter(FakeQuery::Sites)?;
        let sites = self.snapshot_sites();

        let gate = self.sites_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        Ok(sites)
    }

    async fn fetch_material_summary(&self) -> RepositoryResult<Vec<MaterialSummaryRow>> {
        self.fetch_material_summary_rows()
    }

    async fn fetch_rows_for_site(&self, site_key: &str) -> RepositoryResult<Vec<SiteRow>> {
        self.enter(FakeQuery::RowsForSite)?;
        let rows = self.rows.lock().unwrap();
        let mut result: Vec<SiteRow> = rows
            .iter()
            .filter(|r| r.site_key == site_key)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            (&a.material_stream, &a.load_name).cmp(&(&b.material_stream, &b.load_name))
        });
        Ok(result)
    }

    async fn move_material(&self, request: &MoveRequest) -> RepositoryResult<MoveTotals> {
        self.enter(FakeQuery::MoveMaterial)?;
        let mut rows = self.rows.lock().unwrap();

        if request.delta_mt <= 0.0 {
            return Err(Self::rejected("delta must be positive".to_string()));
        }
        if request.from_key == request.to_key {
            return Err(Self::rejected("from and to must differ".to_string()));
        }
        for key in [&request.from_key, &request.to_key] {
            if !rows.iter().any(|r| &r.site_key == key) {
                return Err(Self::rejected(format!("unknown site {}", key)));
            }
        }

        let from_before = Self::site_total(&rows, &request.from_key);
        let to_before = Self::site_total(&rows, &request.to_key);
        if from_before < request.delta_mt {
            return Err(Self::rejected(format!(
                "Not enough material at {} (have {}, need {})",
                request.from_key, from_before, request.delta_mt
            )));
        }

        let from_after = from_before - request.delta_mt;
        let to_after = to_before + request.delta_mt;
        rescale(&mut rows, &request.from_key, from_before, from_after);
        rescale(&mut rows, &request.to_key, to_before, to_after);

        Ok(MoveTotals {
            from_before,
            from_after,
            to_before,
            to_after,
        })
    }

    async fn reset_site(&self, site_key: &str) -> RepositoryResult<i64> {
        self.enter(FakeQuery::ResetSite)?;
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for row in rows
            .iter_mut()
            .filter(|r| r.site_key == site_key && r.has_override())
        {
            row.mt_total_override = None;
            recompute(row);
            count += 1;
        }
        Ok(count)
    }

    async fn reset_all(&self) -> RepositoryResult<i64> {
        self.enter(FakeQuery::ResetAll)?;
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for row in rows.iter_mut().filter(|r| r.has_override()) {
            row.mt_total_override = None;
            recompute(row);
            count += 1;
        }
        Ok(count)
    }
}
