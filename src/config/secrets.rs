// ==========================================
// Transfer Model - 本地 secrets 存储
// ==========================================
// 格式: JSON 对象，例如 {"PG_DSN": "postgres://..."}
// 位置: TRANSFER_MODEL_SECRETS_FILE 或 <config_dir>/transfer-model/secrets.json
// ==========================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::app_config::ConfigError;

/// 本地 secrets 存储（只读）
#[derive(Debug, Clone, Default)]
pub struct SecretsStore {
    values: HashMap<String, String>,
}

impl SecretsStore {
    /// 从文件加载
    ///
    /// 文件不存在视为空存储；文件存在但无法解析则返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::debug!("secrets 文件不存在: {}", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::SecretsUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let json: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::SecretsUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        // 只保留字符串值，其它类型按 JSON 文本保存
        let values = json
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();

        Ok(Self { values })
    }

    /// 默认 secrets 文件路径
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("transfer-model")
            .join("secrets.json")
    }

    /// 读取非空值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
