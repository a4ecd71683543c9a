// ==========================================
// 药品配送无人机调度系统 - 核心库
// ==========================================
// 技术栈: actix-web + Rust + SQLite
// 系统定位: 机队装载分配（first-fit,严格载重上限,电量下限）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 HTTP 接入
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DroneModel, DroneState, LoadOutcome};

// 领域实体
pub use domain::{Catalog, CatalogEntry, Drone, LoadLog, Medication, NewDrone, NewMedication};

// 引擎
pub use engine::{DroneStateMachine, LoadResult, LoadingAllocator};

// API
pub use api::{ApiError, ApiResult, FleetApi, LoadingApi, PayloadApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "药品配送无人机调度系统";
