// ==========================================
// 药品配送无人机调度系统 - 目录数据仓储
// ==========================================
// 职责: drone_model / drone_state 表的初始化与只读查询
// 红线: 目录只在启动时写入一次
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::catalog::{Catalog, CatalogEntry};
use crate::domain::error::ValidationFailure;
use crate::domain::types::{DroneModel, DroneState};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// 目录名称列 → 枚举
// ==========================================
impl FromSql for DroneModel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;
        DroneModel::from_name(name).ok_or_else(|| {
            FromSqlError::Other(Box::new(ValidationFailure::UnknownModel(name.to_string())))
        })
    }
}

impl FromSql for DroneState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;
        DroneState::from_name(name).ok_or_else(|| {
            FromSqlError::Other(Box::new(ValidationFailure::UnknownState(name.to_string())))
        })
    }
}

// ==========================================
// CatalogRepository - 目录仓储
// ==========================================
pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// 创建新的 CatalogRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入标准目录（INSERT OR IGNORE,幂等）
    pub fn seed_catalog(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let standard = Catalog::standard();

        for entry in standard.models() {
            tx.execute(
                "INSERT OR IGNORE INTO drone_model (id, name) VALUES (?1, ?2)",
                params![entry.id, entry.name],
            )?;
        }
        for entry in standard.states() {
            tx.execute(
                "INSERT OR IGNORE INTO drone_state (id, name) VALUES (?1, ?2)",
                params![entry.id, entry.name],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 查询机型目录（按 id 排序）
    pub fn list_models(&self) -> RepositoryResult<Vec<CatalogEntry>> {
        self.list_entries("SELECT id, name FROM drone_model ORDER BY id")
    }

    /// 查询状态目录（按 id 排序）
    pub fn list_states(&self) -> RepositoryResult<Vec<CatalogEntry>> {
        self.list_entries("SELECT id, name FROM drone_state ORDER BY id")
    }

    /// 加载并校验目录
    pub fn load_catalog(&self) -> RepositoryResult<Catalog> {
        let models = self.list_models()?;
        let states = self.list_states()?;
        Ok(Catalog::from_entries(models, states)?)
    }

    fn list_entries(&self, sql: &str) -> RepositoryResult<Vec<CatalogEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CatalogEntry {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
