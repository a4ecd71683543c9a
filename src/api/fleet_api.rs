// ==========================================
// 药品配送无人机调度系统 - 机队 API
// ==========================================
// 职责: 目录查询、无人机注册、可用机查询、电量查询
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::catalog::{Catalog, CatalogEntry};
use crate::domain::drone::{Drone, NewDrone};
use crate::domain::types::DroneState;
use crate::repository::{DroneRepository, MedicationRepository};

// ==========================================
// 请求 / 响应结构
// ==========================================

/// 注册无人机请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDroneRequest {
    pub serial: String,
    pub model: String, // 机型名称,如 "Lightweight"
    pub max_weight: i64,
    pub battery: i64,
}

/// 电量查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub serial: String,
    pub battery: i64,
}

/// 机队概况（心跳日志使用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub drones: i64,
    pub idle: i64,
    pub loading: i64,
    pub loaded: i64,
    pub medications: i64,
    pub unassigned_medications: i64,
}

// ==========================================
// FleetApi - 机队 API
// ==========================================
pub struct FleetApi {
    catalog: Arc<Catalog>,
    drone_repo: Arc<DroneRepository>,
    medication_repo: Arc<MedicationRepository>,
}

impl FleetApi {
    pub fn new(
        catalog: Arc<Catalog>,
        drone_repo: Arc<DroneRepository>,
        medication_repo: Arc<MedicationRepository>,
    ) -> Self {
        Self {
            catalog,
            drone_repo,
            medication_repo,
        }
    }

    // ==========================================
    // 目录查询（启动时加载的只读表）
    // ==========================================

    pub fn list_models(&self) -> Vec<CatalogEntry> {
        self.catalog.models().to_vec()
    }

    pub fn list_states(&self) -> Vec<CatalogEntry> {
        self.catalog.states().to_vec()
    }

    // ==========================================
    // 无人机查询
    // ==========================================

    pub fn list_drones(&self) -> ApiResult<Vec<Drone>> {
        Ok(self.drone_repo.list_all()?)
    }

    /// 可用无人机（状态 IDLE,含机型/状态名称）
    pub fn list_available(&self) -> ApiResult<Vec<Drone>> {
        Ok(self.drone_repo.list_by_state(DroneState::Idle)?)
    }

    pub fn get_drone(&self, serial: &str) -> ApiResult<Drone> {
        self.drone_repo
            .find_by_serial(serial)?
            .ok_or_else(|| ApiError::NotFound(format!("Drone(id={})不存在", serial)))
    }

    /// 电量查询
    pub fn get_battery(&self, serial: &str) -> ApiResult<BatteryStatus> {
        let drone = self.get_drone(serial)?;
        Ok(BatteryStatus {
            serial: drone.serial,
            battery: drone.battery,
        })
    }

    // ==========================================
    // 注册
    // ==========================================

    /// 注册无人机
    ///
    /// # 错误
    /// - ValidationFailure: 未知机型 / 序列号过长 / 载重或电量越界
    /// - BusinessRuleViolation: 序列号重复
    pub fn register_drone(&self, request: RegisterDroneRequest) -> ApiResult<Drone> {
        let model = self.catalog.resolve_model(&request.model)?;
        let new_drone = NewDrone::new(request.serial, request.max_weight, request.battery, model)?;

        let drone = self.drone_repo.insert(&new_drone)?;
        info!(
            serial = %drone.serial,
            model = %drone.model,
            max_weight = drone.max_weight,
            "无人机注册完成"
        );
        Ok(drone)
    }

    // ==========================================
    // 概况
    // ==========================================

    pub fn fleet_summary(&self) -> ApiResult<FleetSummary> {
        Ok(FleetSummary {
            drones: self.drone_repo.count()?,
            idle: self.drone_repo.count_by_state(DroneState::Idle)?,
            loading: self.drone_repo.count_by_state(DroneState::Loading)?,
            loaded: self.drone_repo.count_by_state(DroneState::Loaded)?,
            medications: self.medication_repo.count()?,
            unassigned_medications: self.medication_repo.count_unassigned()?,
        })
    }
}
