// ==========================================
// Transfer Model - CSV 导出
// ==========================================
// 职责: 站点列表 / 站点明细 / 物料汇总导出为 CSV 文本
// ==========================================

use csv::Writer;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{MaterialSummaryRow, Site, SiteRow};

/// 站点列表导出列
pub const SITE_EXPORT_HEADERS: [&str; 9] = [
    "site_key",
    "name",
    "address",
    "row_count",
    "lat",
    "lon",
    "mt_total",
    "current_loads",
    "current_transfer_hours",
];

/// 导出站点列表
pub fn sites_to_csv(sites: &[Site]) -> ApiResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(SITE_EXPORT_HEADERS).map_err(csv_error)?;

    for site in sites {
        writer
            .write_record([
                site.site_key.clone(),
                site.name.clone(),
                site.address.clone(),
                site.row_count.to_string(),
                opt_to_string(site.lat),
                opt_to_string(site.lon),
                site.mt_total.to_string(),
                site.current_loads.to_string(),
                site.current_transfer_hours.to_string(),
            ])
            .map_err(csv_error)?;
    }

    finish(writer)
}

/// 导出单站点明细（列与 rf_static 一致）
pub fn site_rows_to_csv(rows: &[SiteRow]) -> ApiResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    finish(writer)
}

/// 导出物料汇总（列顺序取视图列顺序）
pub fn material_summary_to_csv(rows: &[MaterialSummaryRow]) -> ApiResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    let Some(first) = rows.first() else {
        return finish(writer);
    };

    let headers: Vec<&str> = first.column_names().collect();
    writer.write_record(&headers).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(headers.iter().map(|column| row.display(column)))
            .map_err(csv_error)?;
    }

    finish(writer)
}

fn opt_to_string(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> ApiResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::InternalError(format!("CSV 写入失败: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::InternalError(format!("CSV 编码失败: {}", e)))
}

fn csv_error(e: csv::Error) -> ApiError {
    ApiError::InternalError(format!("CSV 写入失败: {}", e))
}
