// ==========================================
// 药品配送无人机调度系统 - HTTP 服务主入口
// ==========================================
// 技术栈: actix-web + Rust + SQLite
// ==========================================

use actix_web::{web, App, HttpServer};

use drone_dispatch::app::{configure_routes, get_default_db_path, spawn_heartbeat, AppState};
use drone_dispatch::config::defaults;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化日志系统
    drone_dispatch::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", drone_dispatch::APP_NAME);
    tracing::info!("系统版本: {}", drone_dispatch::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path).map_err(std::io::Error::other)?;

    let config = app_state.config_manager.clone();
    let host = config.get_server_host().unwrap_or_else(|e| {
        tracing::warn!("读取 server/host 失败，使用默认值: {}", e);
        defaults::SERVER_HOST.to_string()
    });
    let port = config.get_server_port().unwrap_or_else(|e| {
        tracing::warn!("读取 server/port 失败，使用默认值: {}", e);
        defaults::SERVER_PORT
    });
    let heartbeat_secs = config.get_heartbeat_interval_secs().unwrap_or_else(|e| {
        tracing::warn!("读取 heartbeat/interval_secs 失败，使用默认值: {}", e);
        defaults::HEARTBEAT_INTERVAL_SECS
    });

    let state = web::Data::new(app_state);
    let _heartbeat = spawn_heartbeat(state.fleet_api.clone(), heartbeat_secs);

    tracing::info!("HTTP 服务启动: http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
