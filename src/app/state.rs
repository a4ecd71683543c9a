// ==========================================
// 药品配送无人机调度系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{FleetApi, LoadingApi, PayloadApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::{DroneLocks, FleetRepositories, LoadingAllocator};
use crate::perf::install_sqlite_tracing;
use crate::repository::{
    CatalogRepository, DroneRepository, LoadLogRepository, MedicationRepository,
};

use super::seed::{seed_demo_fleet, SeedReport};

/// 应用状态
///
/// 包含所有API实例和共享资源,在 HTTP 服务中作为 `web::Data` 共享
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 机队API
    pub fleet_api: Arc<FleetApi>,

    /// 装载API
    pub loading_api: Arc<LoadingApi>,

    /// 药品API
    pub payload_api: Arc<PayloadApi>,

    /// 启动时写入的演示数据
    pub seed_report: SeedReport,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表
    /// 2. 写入目录并加载为只读查找表
    /// 3. 按配置写入演示机队（仅空库）
    /// 4. 创建装载引擎和所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 创建不写入演示数据的AppState（测试 / 空库部署使用）
    pub fn new_without_demo_data(db_path: String) -> Result<Self, String> {
        Self::build(db_path, Some(false))
    }

    fn build(db_path: String, seed_override: Option<bool>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let perf = install_sqlite_tracing(&mut conn);
        tracing::debug!(
            sql_tracing = perf.sql_tracing,
            slow_sql_ms = perf.slow_sql_ms,
            "SQL 追踪配置"
        );
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 目录（只读查找表）
        // ==========================================
        let catalog_repo = CatalogRepository::from_connection(conn.clone());
        catalog_repo
            .seed_catalog()
            .map_err(|e| format!("目录初始化失败: {}", e))?;
        let catalog = Arc::new(
            catalog_repo
                .load_catalog()
                .map_err(|e| format!("目录加载失败: {}", e))?,
        );

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let min_battery_pct = config_manager
            .get_min_battery_pct()
            .map_err(|e| format!("读取最低电量配置失败: {}", e))?;
        let seed_enabled = match seed_override {
            Some(v) => v,
            None => config_manager
                .get_seed_demo_fleet()
                .map_err(|e| format!("读取演示数据配置失败: {}", e))?,
        };

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let drone_repo = Arc::new(DroneRepository::from_connection(conn.clone()));
        let medication_repo = Arc::new(MedicationRepository::from_connection(conn.clone()));
        let load_log_repo = Arc::new(LoadLogRepository::from_connection(conn.clone()));

        let seed_report = if seed_enabled {
            seed_demo_fleet(&drone_repo, &medication_repo, &mut rand::thread_rng())
                .map_err(|e| format!("演示数据写入失败: {}", e))?
        } else {
            SeedReport::default()
        };

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let repos = FleetRepositories::new(
            drone_repo.clone(),
            medication_repo.clone(),
            load_log_repo.clone(),
        );
        let allocator = Arc::new(LoadingAllocator::new(
            repos,
            Arc::new(DroneLocks::new()),
            min_battery_pct,
        ));

        // ==========================================
        // 创建API实例
        // ==========================================
        let fleet_api = Arc::new(FleetApi::new(
            catalog,
            drone_repo.clone(),
            medication_repo.clone(),
        ));
        let loading_api = Arc::new(LoadingApi::new(
            allocator,
            drone_repo,
            medication_repo.clone(),
            load_log_repo,
        ));
        let payload_api = Arc::new(PayloadApi::new(medication_repo));

        tracing::info!(
            min_battery_pct,
            seeded_drones = seed_report.drones,
            seeded_medications = seed_report.medications,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config_manager,
            fleet_api,
            loading_api,
            payload_api,
            seed_report,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 DRONE_DISPATCH_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("DRONE_DISPATCH_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./drone_dispatch.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("drone-dispatch-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("drone-dispatch");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("drone_dispatch.db");
        }
    }

    path.to_string_lossy().to_string()
}
