use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;
use crate::domain::medication::Medication;
use crate::domain::types::LoadOutcome;
use crate::engine::LoadResult;

use super::common::{blocking, Envelope};

// ==========================================
// 装载相关接口
// ==========================================

/// POST /drone/{serial}/load 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    pub result: Vec<Medication>,
    pub limit: i64,
    pub message: String,
    pub load: i64,
    pub outcome: LoadOutcome,
}

impl From<LoadResult> for LoadResponse {
    fn from(r: LoadResult) -> Self {
        Self {
            result: r.assigned,
            limit: r.limit,
            message: r.message,
            load: r.load,
            outcome: r.outcome,
        }
    }
}

/// GET /drone/{serial}/load 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResponse {
    pub result: Vec<Medication>,
    pub weight: i64,
}

/// POST /drone/{serial}/load
pub async fn load_drone(state: web::Data<AppState>, serial: web::Path<String>) -> HttpResponse {
    let loading_api = state.loading_api.clone();
    let serial = serial.into_inner();
    match blocking("http.load_drone", move || loading_api.load_drone(&serial)).await {
        Ok(result) => HttpResponse::Ok().json(LoadResponse::from(result)),
        Err(resp) => resp,
    }
}

/// GET /drone/{serial}/load
pub async fn inspect_load(state: web::Data<AppState>, serial: web::Path<String>) -> HttpResponse {
    let loading_api = state.loading_api.clone();
    let serial = serial.into_inner();
    match blocking("http.inspect_load", move || loading_api.inspect_load(&serial)).await {
        Ok(inspection) => HttpResponse::Ok().json(InspectResponse {
            result: inspection.items,
            weight: inspection.total_weight,
        }),
        Err(resp) => resp,
    }
}

/// GET /drone/{serial}/load/history
pub async fn load_history(state: web::Data<AppState>, serial: web::Path<String>) -> HttpResponse {
    let loading_api = state.loading_api.clone();
    let serial = serial.into_inner();
    match blocking("http.load_history", move || loading_api.load_history(&serial)).await {
        Ok(logs) => HttpResponse::Ok().json(Envelope::new(logs)),
        Err(resp) => resp,
    }
}
