// ==========================================
// 药品配送无人机调度系统 - 无人机数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（状态转换规则在 engine::state_machine）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::drone::{Drone, NewDrone};
use crate::domain::types::DroneState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

/// 无人机查询（关联机型/状态目录名称）
const DRONE_SELECT: &str = r#"
    SELECT d.id, d.serial, d.max_weight, d.battery, m.name, s.name
    FROM drone d
    JOIN drone_model m ON m.id = d.model_id
    JOIN drone_state s ON s.id = d.state_id
"#;

// ==========================================
// DroneRepository - 无人机仓储
// ==========================================
pub struct DroneRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DroneRepository {
    /// 创建新的 DroneRepository 实例
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Drone> {
        Ok(Drone {
            id: row.get(0)?,
            serial: row.get(1)?,
            max_weight: row.get(2)?,
            battery: row.get(3)?,
            model: row.get(4)?,
            state: row.get(5)?,
        })
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 登记无人机（初始状态 IDLE）
    ///
    /// # 返回
    /// - Ok(Drone): 落库后的完整记录
    /// - Err(UniqueConstraintViolation): 序列号已存在
    pub fn insert(&self, drone: &NewDrone) -> RepositoryResult<Drone> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO drone (serial, max_weight, battery, model_id, state_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                drone.serial(),
                drone.max_weight(),
                drone.battery(),
                drone.model().id(),
                drone.initial_state().id(),
            ],
        )?;

        Ok(Drone {
            id: conn.last_insert_rowid(),
            serial: drone.serial().to_string(),
            max_weight: drone.max_weight(),
            battery: drone.battery(),
            model: drone.model(),
            state: drone.initial_state(),
        })
    }

    /// 更新状态（单条提交）
    pub fn update_state(&self, drone_id: i64, state: DroneState) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE drone SET state_id = ?1 WHERE id = ?2",
            params![state.id(), drone_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Drone".to_string(),
                id: drone_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按序列号查询
    pub fn find_by_serial(&self, serial: &str) -> RepositoryResult<Option<Drone>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE d.serial = ?1", DRONE_SELECT);
        let drone = conn
            .query_row(&sql, params![serial], Self::map_row)
            .optional()?;
        Ok(drone)
    }

    /// 全部无人机（按 id 排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Drone>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY d.id", DRONE_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 指定状态的无人机（按 id 排序）
    pub fn list_by_state(&self, state: DroneState) -> RepositoryResult<Vec<Drone>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE d.state_id = ?1 ORDER BY d.id", DRONE_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![state.id()], Self::map_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM drone", [], |row| row.get(0))?)
    }

    pub fn count_by_state(&self, state: DroneState) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM drone WHERE state_id = ?1",
            params![state.id()],
            |row| row.get(0),
        )?)
    }
}
