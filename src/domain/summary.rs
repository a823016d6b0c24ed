// ==========================================
// Transfer Model - 物料汇总行
// ==========================================
// 对齐: rf_site_summary_display 视图
// 说明: 视图已按展示格式化，本层只透传，保持列顺序
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const COLUMN_FACILITY: &str = "Facility";
pub const COLUMN_MATERIAL_STREAM: &str = "Material Stream";
pub const COLUMN_LOAD_NAME: &str = "Load Name";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummaryRow {
    /// 视图全部列（保持视图列顺序）
    pub columns: Map<String, Value>,
}

impl MaterialSummaryRow {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self { columns }
    }

    pub fn facility(&self) -> Option<&str> {
        self.text(COLUMN_FACILITY)
    }

    pub fn material_stream(&self) -> Option<&str> {
        self.text(COLUMN_MATERIAL_STREAM)
    }

    pub fn load_name(&self) -> Option<&str> {
        self.text(COLUMN_LOAD_NAME)
    }

    /// 列名（按视图顺序）
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// 单元格展示文本
    pub fn display(&self, column: &str) -> String {
        match self.columns.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(Value::as_str)
    }
}
