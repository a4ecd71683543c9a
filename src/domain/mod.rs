// ==========================================
// 药品配送无人机调度系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、目录类型、构造期校验规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod drone;
pub mod error;
pub mod load_log;
pub mod medication;
pub mod types;

// 重导出核心类型
pub use catalog::{Catalog, CatalogEntry};
pub use drone::{validate_serial, Drone, NewDrone, MAX_SERIAL_LEN};
pub use error::ValidationFailure;
pub use load_log::LoadLog;
pub use medication::{validate_medication_code, Medication, NewMedication};
pub use types::{validate_weight, DroneModel, DroneState, LoadOutcome, MAX_WEIGHT_GRAMS};
