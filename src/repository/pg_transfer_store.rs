// ==========================================
// Transfer Model - PostgreSQL 数据源实现
// ==========================================
// 红线: SQL 对象名与列名为外部契约，不得改名
// 说明: 列统一在 SQL 侧转换为 float8 / text / int8，
//       使解码不依赖视图的具体数值类型
// ==========================================

use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::domain::{MaterialSummaryRow, MoveRequest, MoveTotals, Site, SiteRow, Totals};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::transfer_store::TransferStore;

// ==========================================
// SQL 契约
// ==========================================

pub(crate) const SQL_TOTALS: &str = r#"
    SELECT current_loads_annual::float8  AS current_loads_annual,
           delta_loads_annual::float8    AS delta_loads_annual,
           current_hours_annual::float8  AS current_hours_annual,
           delta_hours_annual::float8    AS delta_hours_annual,
           current_hours_monthly::float8 AS current_hours_monthly,
           delta_hours_monthly::float8   AS delta_hours_monthly
    FROM rf_overall_totals
    LIMIT 1
"#;

pub(crate) const SQL_SITES: &str = r#"
    SELECT site_key::text                                               AS site_key,
           coalesce(from_facility::text, site_key::text)                AS name,
           coalesce(address::text, '')                                  AS address,
           avg(lat)::float8                                             AS lat,
           avg(lon)::float8                                             AS lon,
           count(*)::int8                                               AS row_count,
           coalesce(sum(baseline_num_loads), 0)::float8                 AS baseline_loads,
           coalesce(sum(current_num_loads), 0)::float8                  AS current_loads,
           coalesce(sum(baseline_transfer_hours_yr), 0)::float8         AS baseline_transfer_hours,
           coalesce(sum(current_transfer_hours_yr), 0)::float8          AS current_transfer_hours,
           string_agg(DISTINCT road_restrictions::text, ', ')           AS road_restrictions,
           coalesce(sum(coalesce(mt_total_override, mt_total)), 0)::float8 AS mt_total,
           max(round_trip_hours)::float8                                AS round_trip_hours
    FROM rf_static
    GROUP BY site_key, from_facility, address
    ORDER BY name
"#;

pub(crate) const SQL_MATERIAL_SUMMARY: &str = r#"
    SELECT to_json(d)::text AS row_json
    FROM rf_site_summary_display AS d
    ORDER BY d."Facility", d."Material Stream", d."Load Name"
"#;

pub(crate) const SQL_ROWS_FOR_SITE: &str = r#"
    SELECT site_key::text                      AS site_key,
           coalesce(from_facility::text, '')   AS from_facility,
           address::text                       AS address,
           lat::float8                         AS lat,
           lon::float8                         AS lon,
           road_restrictions::text             AS road_restrictions,
           mt_total::float8                    AS mt_total,
           mt_total_override::float8           AS mt_total_override,
           round_trip_hours::float8            AS round_trip_hours,
           baseline_num_loads::float8          AS baseline_num_loads,
           current_num_loads::float8           AS current_num_loads,
           delta_num_loads::float8             AS delta_num_loads,
           baseline_transfer_hours_yr::float8  AS baseline_transfer_hours_yr,
           current_transfer_hours_yr::float8   AS current_transfer_hours_yr,
           delta_transfer_hours_yr::float8     AS delta_transfer_hours_yr,
           material_stream::text               AS material_stream,
           load_name::text                     AS load_name
    FROM rf_static
    WHERE site_key::text = $1
    ORDER BY material_stream, load_name
"#;

pub(crate) const SQL_MOVE_MATERIAL: &str = r#"
    SELECT from_before::float8 AS from_before,
           from_after::float8  AS from_after,
           to_before::float8   AS to_before,
           to_after::float8    AS to_after
    FROM move_material_between_sites($1::text, $2::text, $3::numeric)
"#;

pub(crate) const SQL_RESET_SITE: &str = "SELECT reset_site_override($1::text)::int8";

pub(crate) const SQL_RESET_ALL: &str = "SELECT reset_all_overrides()::int8";

// ==========================================
// PgTransferStore
// ==========================================
pub struct PgTransferStore {
    pool: PgPool,
}

impl PgTransferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferStore for PgTransferStore {
    async fn fetch_totals(&self) -> RepositoryResult<Totals> {
        let started = Instant::now();
        let totals = sqlx::query_as::<_, Totals>(SQL_TOTALS)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "rf_overall_totals".to_string(),
                id: "(single row)".to_string(),
            })?;
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "查询 rf_overall_totals");
        Ok(totals)
    }

    async fn fetch_sites(&self) -> RepositoryResult<Vec<Site>> {
        let started = Instant::now();
        let sites = sqlx::query_as::<_, Site>(SQL_SITES)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(
            rows = sites.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "查询站点聚合"
        );
        Ok(sites)
    }

    async fn fetch_material_summary(&self) -> RepositoryResult<Vec<MaterialSummaryRow>> {
        let started = Instant::now();
        let raw_rows = sqlx::query_scalar::<_, String>(SQL_MATERIAL_SUMMARY)
            .fetch_all(&self.pool)
            .await?;

        let rows = raw_rows
            .iter()
            .map(String::as_str)
            .map(decode_summary_row)
            .collect::<RepositoryResult<Vec<_>>>()?;

        tracing::debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "查询 rf_site_summary_display"
        );
        Ok(rows)
    }

    async fn fetch_rows_for_site(&self, site_key: &str) -> RepositoryResult<Vec<SiteRow>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, SiteRow>(SQL_ROWS_FOR_SITE)
            .bind(site_key)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(
            site_key,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "查询站点明细"
        );
        Ok(rows)
    }

    async fn move_material(&self, request: &MoveRequest) -> RepositoryResult<MoveTotals> {
        sqlx::query_as::<_, MoveTotals>(SQL_MOVE_MATERIAL)
            .bind(&request.from_key)
            .bind(&request.to_key)
            .bind(request.delta_mt)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_procedure)
    }

    async fn reset_site(&self, site_key: &str) -> RepositoryResult<i64> {
        let rows = sqlx::query_scalar::<_, Option<i64>>(SQL_RESET_SITE)
            .bind(site_key)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_procedure)?;
        Ok(rows.unwrap_or(0))
    }

    async fn reset_all(&self) -> RepositoryResult<i64> {
        let rows = sqlx::query_scalar::<_, Option<i64>>(SQL_RESET_ALL)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_procedure)?;
        Ok(rows.unwrap_or(0))
    }
}

/// 解析 to_json(row) 文本为有序列映射
fn decode_summary_row(raw: &str) -> RepositoryResult<MaterialSummaryRow> {
    let columns: Map<String, Value> =
        serde_json::from_str(raw).map_err(|e| RepositoryError::DecodeError {
            column: "row_json".to_string(),
            message: e.to_string(),
        })?;
    Ok(MaterialSummaryRow::new(columns))
}
