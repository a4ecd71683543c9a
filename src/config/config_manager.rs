// ==========================================
// 药品配送无人机调度系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope,当前只使用 global)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::loading::DEFAULT_MIN_BATTERY_PCT;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置,格式错误时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %value,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 装载配置 =====

    /// 最低电量（%）,默认 25
    pub fn get_min_battery_pct(&self) -> Result<i64, Box<dyn Error>> {
        let value = self.get_parsed_or_default(config_keys::MIN_BATTERY_PCT, DEFAULT_MIN_BATTERY_PCT)?;
        if !(0..=100).contains(&value) {
            tracing::warn!(
                config_key = config_keys::MIN_BATTERY_PCT,
                value,
                "最低电量超出 0-100，使用默认值"
            );
            return Ok(DEFAULT_MIN_BATTERY_PCT);
        }
        Ok(value)
    }

    // ===== 服务配置 =====

    pub fn get_server_host(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::SERVER_HOST, defaults::SERVER_HOST)
    }

    pub fn get_server_port(&self) -> Result<u16, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::SERVER_PORT, defaults::SERVER_PORT)
    }

    /// 心跳日志间隔（秒）,0 视为关闭
    pub fn get_heartbeat_interval_secs(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::HEARTBEAT_INTERVAL_SECS,
            defaults::HEARTBEAT_INTERVAL_SECS,
        )
    }

    /// 空库时是否写入演示机队
    pub fn get_seed_demo_fleet(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::SEED_DEMO_FLEET, "true")?;
        Ok(matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 装载
    pub const MIN_BATTERY_PCT: &str = "loading/min_battery_pct";

    // HTTP 服务
    pub const SERVER_HOST: &str = "server/host";
    pub const SERVER_PORT: &str = "server/port";

    // 心跳
    pub const HEARTBEAT_INTERVAL_SECS: &str = "heartbeat/interval_secs";

    // 演示数据
    pub const SEED_DEMO_FLEET: &str = "seed/demo_fleet";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const SERVER_HOST: &str = "0.0.0.0";
    pub const SERVER_PORT: u16 = 5000;
    pub const HEARTBEAT_INTERVAL_SECS: u64 = 10;
}
