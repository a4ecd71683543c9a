// ==========================================
// 药品配送无人机调度系统 - 装载 API
// ==========================================
// 职责: 装载、装载查看、装载日志
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::drone::Drone;
use crate::domain::load_log::LoadLog;
use crate::domain::medication::Medication;
use crate::engine::loading::{LoadResult, LoadingAllocator};
use crate::repository::{DroneRepository, LoadLogRepository, MedicationRepository};

/// 装载查看结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadInspection {
    pub items: Vec<Medication>,
    pub total_weight: i64,
}

// ==========================================
// LoadingApi - 装载 API
// ==========================================
pub struct LoadingApi {
    allocator: Arc<LoadingAllocator>,
    drone_repo: Arc<DroneRepository>,
    medication_repo: Arc<MedicationRepository>,
    load_log_repo: Arc<LoadLogRepository>,
}

impl LoadingApi {
    pub fn new(
        allocator: Arc<LoadingAllocator>,
        drone_repo: Arc<DroneRepository>,
        medication_repo: Arc<MedicationRepository>,
        load_log_repo: Arc<LoadLogRepository>,
    ) -> Self {
        Self {
            allocator,
            drone_repo,
            medication_repo,
            load_log_repo,
        }
    }

    /// 装载指定无人机
    ///
    /// 电量不足与达到载重上限通过 `outcome` 返回,不是错误
    pub fn load_drone(&self, serial: &str) -> ApiResult<LoadResult> {
        Ok(self.allocator.load(serial)?)
    }

    /// 查看当前装载（只读,不检查电量）
    pub fn inspect_load(&self, serial: &str) -> ApiResult<LoadInspection> {
        let drone = self.resolve(serial)?;
        let items = self.medication_repo.list_by_drone(drone.id)?;
        let total_weight = items.iter().map(|m| m.weight).sum();
        Ok(LoadInspection {
            items,
            total_weight,
        })
    }

    /// 装载日志（时间顺序）
    pub fn load_history(&self, serial: &str) -> ApiResult<Vec<LoadLog>> {
        let drone = self.resolve(serial)?;
        Ok(self.load_log_repo.list_by_serial(&drone.serial)?)
    }

    fn resolve(&self, serial: &str) -> ApiResult<Drone> {
        self.drone_repo
            .find_by_serial(serial)?
            .ok_or_else(|| ApiError::NotFound(format!("Drone(id={})不存在", serial)))
    }
}
