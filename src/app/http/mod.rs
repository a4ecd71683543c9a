// ==========================================
// 药品配送无人机调度系统 - HTTP 接入层
// ==========================================
// 职责: 路由注册、请求解析、错误映射
// 约束: 仓储调用一律在 web::block 中执行
// ==========================================

pub mod common;
pub mod fleet;
pub mod loading;
pub mod payload;

use actix_web::error::InternalError;
use actix_web::web::{get, post};
use actix_web::{web, HttpResponse};

pub use common::{Envelope, ErrorResponse};

/// 请求体上限（含 base64 图片）
const JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// 注册所有路由
///
/// - `GET /`: 存活检查
/// - `GET /model`, `GET /state`: 目录
/// - `GET|POST /drone`: 机队列表 / 注册
/// - `GET /drone/available`: 可用无人机（IDLE）
/// - `POST|GET /drone/{serial}/load`: 装载 / 查看装载
/// - `GET /drone/{serial}/load/history`: 装载日志
/// - `GET /drone/{serial}/battery`: 电量
/// - `POST /medication`: 登记药品
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", get().to(fleet::greeting))
        .route("/model", get().to(fleet::list_models))
        .route("/state", get().to(fleet::list_states))
        .route("/drone", get().to(fleet::list_drones))
        .route("/drone", post().to(fleet::register_drone))
        .route("/drone/available", get().to(fleet::list_available))
        .route("/drone/{serial}/load", post().to(loading::load_drone))
        .route("/drone/{serial}/load", get().to(loading::inspect_load))
        .route("/drone/{serial}/load/history", get().to(loading::load_history))
        .route("/drone/{serial}/battery", get().to(fleet::get_battery))
        .route("/medication", post().to(payload::register_medication));
}

/// JSON 解析配置：请求体格式错误时返回统一的 ErrorResponse
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let body = ErrorResponse::new("INVALID_REQUEST_BODY", err.to_string());
            let response = HttpResponse::BadRequest().json(body);
            InternalError::from_response(err, response).into()
        })
}
