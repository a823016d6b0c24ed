// ==========================================
// Transfer Model - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 来源: sqlx (PostgreSQL 视图/过程) 与 rusqlite (本地操作日志)
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("数据解码失败 ({column}): {message}")]
    DecodeError { column: String, message: String },

    // ===== 存储过程错误 =====
    /// 存储过程主动拒绝（如库存不足、站点不存在），消息原样透传
    #[error("{message}")]
    ProcedureRejected {
        code: Option<String>,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 将存储过程调用中的数据库错误归类为业务拒绝
    ///
    /// 过程内 RAISE / 约束违反 → ProcedureRejected（原样消息）
    /// 连接类错误保持为连接错误
    pub fn from_procedure(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => RepositoryError::ProcedureRejected {
                code: db_err.code().map(|c| c.to_string()),
                message: db_err.message().to_string(),
            },
            other => other.into(),
        }
    }

    /// 是否为连接类错误
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RepositoryError::DatabaseConnectionError(_))
    }
}

// 实现 From<sqlx::Error>
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            sqlx::Error::Io(e) => RepositoryError::DatabaseConnectionError(e.to_string()),
            sqlx::Error::Tls(e) => RepositoryError::DatabaseConnectionError(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                RepositoryError::DatabaseConnectionError("连接池获取连接超时".to_string())
            }
            sqlx::Error::PoolClosed => {
                RepositoryError::DatabaseConnectionError("连接池已关闭".to_string())
            }
            sqlx::Error::Configuration(e) => {
                RepositoryError::DatabaseConnectionError(format!("连接配置错误: {}", e))
            }
            sqlx::Error::ColumnDecode { index, source } => RepositoryError::DecodeError {
                column: index,
                message: source.to_string(),
            },
            sqlx::Error::ColumnNotFound(column) => RepositoryError::DecodeError {
                column,
                message: "列不存在".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                RepositoryError::DatabaseQueryError(db_err.message().to_string())
            }
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
