// ==========================================
// Transfer Model - 数据库连接基础设施
// ==========================================
// - PostgreSQL: 延迟连接的连接池（视图/存储过程）
// - SQLite: 本地操作日志连接（统一 PRAGMA）
// ==========================================

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 创建 PostgreSQL 连接池
///
/// 说明：
/// - 延迟连接：数据库不可达不阻塞启动，错误在每次查询时就地返回
/// - test_before_acquire: 取连接前探活（断线自动替换）
/// - 连接串格式错误在此处直接返回
pub fn connect_pg_pool(config: &AppConfig) -> RepositoryResult<PgPool> {
    let options: PgConnectOptions = config.pg_dsn.parse().map_err(|e: sqlx::Error| {
        RepositoryError::DatabaseConnectionError(format!("连接串无法解析: {}", e))
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max_connections)
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .connect_lazy_with(options.application_name("transfer-model"));

    tracing::info!(
        dsn = %config.redacted_dsn(),
        max_connections = config.pool_max_connections,
        "PostgreSQL 连接池已创建（延迟连接）"
    );
    Ok(pool)
}

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(path: impl AsRef<Path>) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}
