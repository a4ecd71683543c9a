// ==========================================
// 药品配送无人机调度系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 接入层调用
// ==========================================

pub mod error;
pub mod fleet_api;
pub mod loading_api;
pub mod payload_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use fleet_api::{BatteryStatus, FleetApi, FleetSummary, RegisterDroneRequest};
pub use loading_api::{LoadInspection, LoadingApi};
pub use payload_api::{PayloadApi, RegisterMedicationRequest};
