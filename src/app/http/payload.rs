use actix_web::{web, HttpResponse};

use crate::api::RegisterMedicationRequest;
use crate::app::state::AppState;

use super::common::{blocking, Envelope};

/// POST /medication
pub async fn register_medication(
    state: web::Data<AppState>,
    body: web::Json<RegisterMedicationRequest>,
) -> HttpResponse {
    let payload_api = state.payload_api.clone();
    let request = body.into_inner();
    match blocking("http.register_medication", move || {
        payload_api.register_medication(request)
    })
    .await
    {
        Ok(medication) => HttpResponse::Created().json(Envelope::new(medication)),
        Err(resp) => resp,
    }
}
