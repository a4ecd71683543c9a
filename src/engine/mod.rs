// ==========================================
// 药品配送无人机调度系统 - 引擎层
// ==========================================
// 职责: 装载分配与状态转换规则,不拼 SQL
// 红线: Engine 不拼 SQL, 所有跳过必须可解释
// ==========================================

pub mod drone_locks;
pub mod loading;
pub mod repositories;
pub mod state_machine;

// 重导出核心引擎
pub use drone_locks::DroneLocks;
pub use loading::{
    scan_candidates, LoadBudget, LoadResult, LoadingAllocator, ScanResult,
    DEFAULT_MIN_BATTERY_PCT,
};
pub use repositories::FleetRepositories;
pub use state_machine::DroneStateMachine;
