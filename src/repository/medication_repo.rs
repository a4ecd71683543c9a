// ==========================================
// 药品配送无人机调度系统 - 药品数据仓储
// ==========================================
// 职责: medication 表的 CRUD
// 约束: 未分配药品按登记顺序 (id 升序) 返回
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::medication::{Medication, NewMedication};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const MEDICATION_SELECT: &str =
    "SELECT id, name, weight, code, done, image, drone_id FROM medication";

// ==========================================
// MedicationRepository - 药品仓储
// ==========================================
pub struct MedicationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MedicationRepository {
    /// 创建新的 MedicationRepository 实例
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

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Medication> {
        Ok(Medication {
            id: row.get(0)?,
            name: row.get(1)?,
            weight: row.get(2)?,
            code: row.get(3)?,
            done: row.get(4)?,
            image: row.get(5)?,
            drone_id: row.get(6)?,
        })
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 登记药品（未分配,done=false）
    pub fn insert(&self, medication: &NewMedication) -> RepositoryResult<Medication> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO medication (name, weight, code, done, image, drone_id) VALUES (?1, ?2, ?3, 0, ?4, NULL)",
            params![
                medication.name(),
                medication.weight(),
                medication.code(),
                medication.image(),
            ],
        )?;

        Ok(Medication {
            id: conn.last_insert_rowid(),
            name: medication.name().to_string(),
            weight: medication.weight(),
            code: medication.code().to_string(),
            done: false,
            image: medication.image().map(|b| b.to_vec()),
            drone_id: None,
        })
    }

    /// 批量登记（事务,保持传入顺序即登记顺序）
    pub fn batch_insert(&self, medications: &[NewMedication]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO medication (name, weight, code, done, image, drone_id) VALUES (?1, ?2, ?3, 0, ?4, NULL)",
            )?;
            for m in medications {
                stmt.execute(params![m.name(), m.weight(), m.code(), m.image()])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// 认领药品: 仅当该药品仍未分配时写入 drone_id
    ///
    /// # 返回
    /// - Ok(true): 本次认领成功
    /// - Ok(false): 已被分配（任意无人机）,未做变更
    ///
    /// # 说明
    /// - 条件更新保证同一药品不会被两次分配
    /// - 重复调用不会产生额外变更
    pub fn assign_to_drone(&self, medication_id: i64, drone_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE medication SET drone_id = ?1 WHERE id = ?2 AND drone_id IS NULL",
            params![drone_id, medication_id],
        )?;
        Ok(affected == 1)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn find_by_id(&self, medication_id: i64) -> RepositoryResult<Option<Medication>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", MEDICATION_SELECT);
        Ok(conn
            .query_row(&sql, params![medication_id], Self::map_row)
            .optional()?)
    }

    /// 未分配药品（登记顺序）
    pub fn list_unassigned(&self) -> RepositoryResult<Vec<Medication>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE drone_id IS NULL ORDER BY id ASC", MEDICATION_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 指定无人机上的药品（登记顺序）
    pub fn list_by_drone(&self, drone_id: i64) -> RepositoryResult<Vec<Medication>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE drone_id = ?1 ORDER BY id ASC", MEDICATION_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![drone_id], Self::map_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 指定无人机当前载重（克）
    pub fn sum_weight_by_drone(&self, drone_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COALESCE(SUM(weight), 0) FROM medication WHERE drone_id = ?1",
            params![drone_id],
            |row| row.get(0),
        )?)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM medication", [], |row| row.get(0))?)
    }

    pub fn count_unassigned(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM medication WHERE drone_id IS NULL",
            [],
            |row| row.get(0),
        )?)
    }
}
