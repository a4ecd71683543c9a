// ==========================================
// 药品配送无人机调度系统 - 装载日志仓储
// ==========================================
// 职责: load_log 表写入与按序列号查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::load_log::LoadLog;
use crate::domain::types::LoadOutcome;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct LoadLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LoadLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入一条装载日志
    pub fn insert(&self, log: &LoadLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO load_log (
                log_id, drone_id, serial, outcome, assigned_count,
                load, limit_weight, detail, action_ts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                log.log_id,
                log.drone_id,
                log.serial,
                log.outcome.as_str(),
                log.assigned_count,
                log.load,
                log.limit_weight,
                log.detail,
                log.action_ts,
            ],
        )?;
        Ok(())
    }

    /// 按序列号查询装载日志（时间升序）
    pub fn list_by_serial(&self, serial: &str) -> RepositoryResult<Vec<LoadLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, drone_id, serial, outcome, assigned_count,
                   load, limit_weight, detail, action_ts
            FROM load_log
            WHERE serial = ?1
            ORDER BY action_ts ASC, rowid ASC
            "#,
        )?;

        let rows = stmt.query_map(params![serial], |row| {
            let outcome_str: String = row.get(3)?;
            let outcome = LoadOutcome::from_str(&outcome_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    Type::Text,
                    format!("未知装载结果: {}", outcome_str).into(),
                )
            })?;

            Ok(LoadLog {
                log_id: row.get(0)?,
                drone_id: row.get(1)?,
                serial: row.get(2)?,
                outcome,
                assigned_count: row.get(4)?,
                load: row.get(5)?,
                limit_weight: row.get(6)?,
                detail: row.get(7)?,
                action_ts: row.get(8)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
