// ==========================================
// 药品配送无人机调度系统 - 应用层
// ==========================================
// 职责: 状态装配、演示数据、HTTP 接入、心跳
// ==========================================

pub mod heartbeat;
pub mod http;
pub mod seed;
pub mod state;

// 重导出
pub use heartbeat::spawn_heartbeat;
pub use http::configure_routes;
pub use seed::{seed_demo_fleet, SeedReport};
pub use state::{get_default_db_path, AppState};
