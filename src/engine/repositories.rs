// ==========================================
// 药品配送无人机调度系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合装载引擎所需的所有 Repository
// ==========================================

use std::sync::Arc;

use crate::repository::{DroneRepository, LoadLogRepository, MedicationRepository};

/// 装载引擎仓储集合
///
/// # 包含的仓储
/// - `drone_repo`: 无人机查询与状态写入
/// - `medication_repo`: 待装载药品与认领
/// - `load_log_repo`: 装载日志
#[derive(Clone)]
pub struct FleetRepositories {
    pub drone_repo: Arc<DroneRepository>,
    pub medication_repo: Arc<MedicationRepository>,
    pub load_log_repo: Arc<LoadLogRepository>,
}

impl FleetRepositories {
    /// 创建新的仓储集合
    pub fn new(
        drone_repo: Arc<DroneRepository>,
        medication_repo: Arc<MedicationRepository>,
        load_log_repo: Arc<LoadLogRepository>,
    ) -> Self {
        Self {
            drone_repo,
            medication_repo,
            load_log_repo,
        }
    }
}
