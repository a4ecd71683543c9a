// ==========================================
// 药品配送无人机调度系统 - 装载分配引擎
// ==========================================
// 红线: 单机载重之和必须严格小于 max_weight（>= 即拒绝）
// 红线: 电量 <= 最低电量时直接返回,不做任何状态变更与分配
// ==========================================
// 职责: 按登记顺序对未分配药品做 first-fit 单遍扫描
// 输入: 无人机序列号
// 输出: 新分配药品列表 + 载重 + 状态 LOADING → LOADED
// 提交: 每一步单独提交,不回滚；中断后状态停留在 LOADING,
//       再次调用 load 会把已分配药品计入载重并继续
// ==========================================

use crate::domain::drone::Drone;
use crate::domain::load_log::LoadLog;
use crate::domain::medication::Medication;
use crate::domain::types::{DroneState, LoadOutcome};
use crate::engine::drone_locks::DroneLocks;
use crate::engine::repositories::FleetRepositories;
use crate::engine::state_machine::DroneStateMachine;
use crate::perf::PerfGuard;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// 默认最低电量（%）,电量必须严格大于该值才能装载
pub const DEFAULT_MIN_BATTERY_PCT: i64 = 25;

// ==========================================
// LoadBudget - 载重预算
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadBudget {
    max_weight: i64,
    current_load: i64,
}

impl LoadBudget {
    pub fn new(max_weight: i64, current_load: i64) -> Self {
        Self {
            max_weight,
            current_load,
        }
    }

    /// 候选是否可装入
    ///
    /// 规则: weight + current_load >= max_weight 即拒绝,
    /// 实际可装载上限为 max_weight - 1 克；求和溢出视为装不下
    pub fn admits(&self, weight: i64) -> bool {
        match weight.checked_add(self.current_load) {
            Some(total) => total < self.max_weight,
            None => false,
        }
    }

    pub fn add(&mut self, weight: i64) {
        self.current_load = self.current_load.saturating_add(weight);
    }

    pub fn current_load(&self) -> i64 {
        self.current_load
    }

    pub fn max_weight(&self) -> i64 {
        self.max_weight
    }

    /// 剩余预算（max_weight - current_load,不小于 0）
    pub fn remaining(&self) -> i64 {
        self.max_weight.saturating_sub(self.current_load).max(0)
    }
}

// ==========================================
// 扫描结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub assigned: Vec<Medication>,
    pub skipped_for_weight: Vec<Medication>,
    pub lost_claims: Vec<Medication>, // 已被其他无人机认领
}

impl ScanResult {
    pub fn limit_reached(&self) -> bool {
        !self.skipped_for_weight.is_empty()
    }
}

/// first-fit 单遍扫描
///
/// - 按传入顺序逐个尝试,超重则跳过并继续扫描后续候选
/// - `claim` 返回 false 表示该药品已被他人认领,跳过且不计重量
pub fn scan_candidates<F>(
    budget: &mut LoadBudget,
    candidates: Vec<Medication>,
    mut claim: F,
) -> RepositoryResult<ScanResult>
where
    F: FnMut(&Medication) -> RepositoryResult<bool>,
{
    let mut result = ScanResult::default();

    for candidate in candidates {
        if !budget.admits(candidate.weight) {
            debug!(
                medication_id = candidate.id,
                weight = candidate.weight,
                current_load = budget.current_load(),
                max_weight = budget.max_weight(),
                "超出载重上限,跳过"
            );
            result.skipped_for_weight.push(candidate);
            continue;
        }

        if !claim(&candidate)? {
            debug!(medication_id = candidate.id, "药品已被认领,跳过");
            result.lost_claims.push(candidate);
            continue;
        }

        budget.add(candidate.weight);
        result.assigned.push(candidate);
    }

    Ok(result)
}

// ==========================================
// LoadResult - 装载结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResult {
    pub assigned: Vec<Medication>, // 本次新分配的药品
    pub limit: i64,                // max_weight
    pub message: String,
    pub load: i64,                 // 结束时载重
    pub outcome: LoadOutcome,
}

// ==========================================
// LoadingAllocator - 装载分配引擎
// ==========================================
pub struct LoadingAllocator {
    repos: FleetRepositories,
    locks: Arc<DroneLocks>,
    state_machine: DroneStateMachine,
    min_battery_pct: i64,
}

impl LoadingAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `repos`: 仓储集合
    /// - `locks`: 单机互斥锁表（按无人机 id,跨请求共享）
    /// - `min_battery_pct`: 最低电量
    pub fn new(repos: FleetRepositories, locks: Arc<DroneLocks>, min_battery_pct: i64) -> Self {
        Self {
            repos,
            locks,
            state_machine: DroneStateMachine::new(),
            min_battery_pct,
        }
    }

    pub fn with_default_config(repos: FleetRepositories) -> Self {
        Self::new(repos, Arc::new(DroneLocks::new()), DEFAULT_MIN_BATTERY_PCT)
    }

    pub fn min_battery_pct(&self) -> i64 {
        self.min_battery_pct
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 装载指定无人机
    ///
    /// 流程：
    /// 1) 解析序列号（不存在 → NotFound）
    /// 2) 电量检查（<= 最低电量 → 直接返回,无副作用）
    /// 3) 计算当前载重（已分配药品）
    /// 4) 状态 → LOADING
    /// 5) 按登记顺序扫描未分配药品,逐个认领
    /// 6) 状态 → LOADED
    #[instrument(skip(self))]
    pub fn load(&self, serial: &str) -> RepositoryResult<LoadResult> {
        let _perf = PerfGuard::for_drone("engine.load", serial);

        // 先解析再加锁: 未知序列号不占用锁表
        let resolved = self.find_drone(serial)?;
        let lock = self.locks.lock_for(resolved.id)?;
        let _guard = lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        // 持锁后重读,拿到前一轮装载提交后的状态
        let drone = self.find_drone(serial)?;

        let current_load = self.repos.medication_repo.sum_weight_by_drone(drone.id)?;

        if drone.battery <= self.min_battery_pct {
            warn!(
                battery = drone.battery,
                min_battery_pct = self.min_battery_pct,
                "电量不足,拒绝装载"
            );
            let result = LoadResult {
                assigned: Vec::new(),
                limit: drone.max_weight,
                message: LoadOutcome::BatteryBelowMinimum.message().to_string(),
                load: current_load,
                outcome: LoadOutcome::BatteryBelowMinimum,
            };
            self.record(&drone, &result);
            return Ok(result);
        }

        self.move_to(&drone, drone.state, DroneState::Loading)?;

        let candidates = self.repos.medication_repo.list_unassigned()?;
        let candidates_count = candidates.len();
        let mut budget = LoadBudget::new(drone.max_weight, current_load);
        let medication_repo = &self.repos.medication_repo;
        let scan = scan_candidates(&mut budget, candidates, |m| {
            medication_repo.assign_to_drone(m.id, drone.id)
        })?;

        self.move_to(&drone, DroneState::Loading, DroneState::Loaded)?;

        let outcome = if scan.limit_reached() {
            LoadOutcome::WeightLimitReached
        } else {
            LoadOutcome::Loaded
        };

        info!(
            candidates = candidates_count,
            assigned = scan.assigned.len(),
            skipped = scan.skipped_for_weight.len(),
            lost_claims = scan.lost_claims.len(),
            load = budget.current_load(),
            limit = drone.max_weight,
            "装载完成"
        );

        let result = LoadResult {
            assigned: scan.assigned,
            limit: drone.max_weight,
            message: outcome.message().to_string(),
            load: budget.current_load(),
            outcome,
        };
        self.record(&drone, &result);
        Ok(result)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn find_drone(&self, serial: &str) -> RepositoryResult<Drone> {
        self.repos
            .drone_repo
            .find_by_serial(serial)?
            .ok_or_else(|| RepositoryError::drone_not_found(serial))
    }

    fn move_to(&self, drone: &Drone, from: DroneState, to: DroneState) -> RepositoryResult<()> {
        let to = self.state_machine.transition(from, to)?;
        self.repos.drone_repo.update_state(drone.id, to)?;
        debug!(from = %from, to = %to, "状态转换");
        Ok(())
    }

    /// 写装载日志（失败只告警,不影响已提交的分配）
    fn record(&self, drone: &Drone, result: &LoadResult) {
        let detail = if result.assigned.is_empty() {
            None
        } else {
            Some(
                result
                    .assigned
                    .iter()
                    .map(|m| m.id.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            )
        };

        let log = LoadLog {
            log_id: uuid::Uuid::new_v4().to_string(),
            drone_id: drone.id,
            serial: drone.serial.clone(),
            outcome: result.outcome,
            assigned_count: result.assigned.len() as i64,
            load: result.load,
            limit_weight: result.limit,
            detail,
            action_ts: chrono::Local::now().naive_local(),
        };

        if let Err(e) = self.repos.load_log_repo.insert(&log) {
            warn!(error = %e, "装载日志写入失败");
        }
    }
}
