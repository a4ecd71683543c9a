use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::api::RegisterDroneRequest;
use crate::app::state::AppState;

use super::common::{blocking, Envelope};

// ==========================================
// 机队相关接口
// ==========================================

/// 问候 / 存活检查
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
    pub now_its: String,
}

pub async fn greeting() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(Greeting {
        message: "It Works!".to_string(),
        now_its: chrono::Local::now().format("%H:%M:%S").to_string(),
    }))
}

/// GET /model
pub async fn list_models(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(state.fleet_api.list_models()))
}

/// GET /state
pub async fn list_states(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(state.fleet_api.list_states()))
}

/// GET /drone
pub async fn list_drones(state: web::Data<AppState>) -> HttpResponse {
    let fleet_api = state.fleet_api.clone();
    match blocking("http.list_drones", move || fleet_api.list_drones()).await {
        Ok(drones) => HttpResponse::Ok().json(Envelope::new(drones)),
        Err(resp) => resp,
    }
}

/// GET /drone/available
pub async fn list_available(state: web::Data<AppState>) -> HttpResponse {
    let fleet_api = state.fleet_api.clone();
    match blocking("http.list_available", move || fleet_api.list_available()).await {
        Ok(drones) => HttpResponse::Ok().json(Envelope::new(drones)),
        Err(resp) => resp,
    }
}

/// POST /drone
pub async fn register_drone(
    state: web::Data<AppState>,
    body: web::Json<RegisterDroneRequest>,
) -> HttpResponse {
    let fleet_api = state.fleet_api.clone();
    let request = body.into_inner();
    match blocking("http.register_drone", move || fleet_api.register_drone(request)).await {
        Ok(drone) => HttpResponse::Created().json(Envelope::new(drone)),
        Err(resp) => resp,
    }
}

/// GET /drone/{serial}/battery
pub async fn get_battery(state: web::Data<AppState>, serial: web::Path<String>) -> HttpResponse {
    let fleet_api = state.fleet_api.clone();
    let serial = serial.into_inner();
    match blocking("http.get_battery", move || fleet_api.get_battery(&serial)).await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(resp) => resp,
    }
}
