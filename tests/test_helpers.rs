// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use drone_dispatch::db::{ensure_schema, open_sqlite_connection};
use drone_dispatch::domain::{Drone, DroneModel, Medication, NewDrone, NewMedication};
use drone_dispatch::engine::{DroneLocks, FleetRepositories, LoadingAllocator};
use drone_dispatch::repository::{
    CatalogRepository, DroneRepository, LoadLogRepository, MedicationRepository,
};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema + 目录
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;
    drop(conn);

    CatalogRepository::new(&db_path)?.seed_catalog()?;

    Ok((temp_file, db_path))
}

/// 打开共享测试连接
pub fn open_test_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(open_sqlite_connection(db_path)?)))
}

// ==========================================
// 测试机队
// ==========================================

pub struct TestFleet {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub drone_repo: Arc<DroneRepository>,
    pub medication_repo: Arc<MedicationRepository>,
    pub load_log_repo: Arc<LoadLogRepository>,
    pub locks: Arc<DroneLocks>,
    pub allocator: Arc<LoadingAllocator>,
}

/// 创建测试机队（共享连接 + 装载引擎）
pub fn setup_fleet(min_battery_pct: i64) -> TestFleet {
    let (temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();

    let drone_repo = Arc::new(DroneRepository::from_connection(conn.clone()));
    let medication_repo = Arc::new(MedicationRepository::from_connection(conn.clone()));
    let load_log_repo = Arc::new(LoadLogRepository::from_connection(conn.clone()));

    let repos = FleetRepositories::new(
        drone_repo.clone(),
        medication_repo.clone(),
        load_log_repo.clone(),
    );
    let locks = Arc::new(DroneLocks::new());
    let allocator = Arc::new(LoadingAllocator::new(repos, locks.clone(), min_battery_pct));

    TestFleet {
        _temp_file: temp_file,
        db_path,
        conn,
        drone_repo,
        medication_repo,
        load_log_repo,
        locks,
        allocator,
    }
}

impl TestFleet {
    /// 注册一架 Lightweight 无人机
    pub fn add_drone(&self, serial: &str, max_weight: i64, battery: i64) -> Drone {
        let new_drone = NewDrone::new(serial, max_weight, battery, DroneModel::Lightweight).unwrap();
        self.drone_repo.insert(&new_drone).unwrap()
    }

    /// 按给定顺序登记药品
    pub fn add_medications(&self, weights: &[i64]) -> Vec<Medication> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let new_med =
                    NewMedication::new(format!("MED {}", i), *w, format!("MED-{:03}", i), None)
                        .unwrap();
                self.medication_repo.insert(&new_med).unwrap()
            })
            .collect()
    }

    pub fn drone(&self, serial: &str) -> Drone {
        self.drone_repo.find_by_serial(serial).unwrap().unwrap()
    }
}

pub fn weights(items: &[Medication]) -> Vec<i64> {
    items.iter().map(|m| m.weight).collect()
}
