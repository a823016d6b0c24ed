use crate::db::open_sqlite_connection;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 操作日志表结构（幂等）
pub(super) const ACTION_LOG_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS transfer_action_log (
        action_id TEXT PRIMARY KEY,
        action_type TEXT NOT NULL,
        action_ts TEXT NOT NULL,
        actor TEXT NOT NULL,
        site_key TEXT,
        payload_json TEXT,
        result_json TEXT,
        detail TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transfer_action_ts ON transfer_action_log(action_ts);
    CREATE INDEX IF NOT EXISTS idx_transfer_action_site_ts ON transfer_action_log(site_key, action_ts);
"#;

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    /// 从已有连接创建（调用方负责建表）
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开（必要时创建）日志库并建表
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RepositoryError::DatabaseConnectionError(format!(
                        "无法创建目录 {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = open_sqlite_connection(path)?;
        let repo = Self::new(Arc::new(Mutex::new(conn)));
        repo.ensure_schema()?;
        Ok(repo)
    }

    /// 内存库（测试/无持久化场景）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::configure_sqlite_connection(&conn)?;
        let repo = Self::new(Arc::new(Mutex::new(conn)));
        repo.ensure_schema()?;
        Ok(repo)
    }

    /// 建表（幂等）
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(ACTION_LOG_SCHEMA)?;
        Ok(())
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入,返回action_id
    /// - `Err(...)`: 数据库错误
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO transfer_action_log (
                action_id, action_type, action_ts, actor,
                site_key, payload_json, result_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.action_id,
                log.action_type.to_db_str(),
                log.action_ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                log.actor,
                log.site_key,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.result_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;

        Ok(log.action_id.clone())
    }
}
