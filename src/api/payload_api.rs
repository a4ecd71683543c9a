// ==========================================
// 药品配送无人机调度系统 - 药品 API
// ==========================================
// 职责: 药品登记
// 说明: 图片在传输层以 base64 表示,入库为原始字节
// ==========================================

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiResult;
use crate::domain::error::ValidationFailure;
use crate::domain::medication::{Medication, NewMedication};
use crate::repository::MedicationRepository;

/// 登记药品请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMedicationRequest {
    pub name: String,
    pub weight: i64,
    pub code: String,
    #[serde(default, alias = "image")]
    pub image_base64: Option<String>,
}

// ==========================================
// PayloadApi - 药品 API
// ==========================================
pub struct PayloadApi {
    medication_repo: Arc<MedicationRepository>,
}

impl PayloadApi {
    pub fn new(medication_repo: Arc<MedicationRepository>) -> Self {
        Self { medication_repo }
    }

    /// 登记药品（未分配,done=false）
    ///
    /// # 错误
    /// - ValidationFailure: 名称为空 / 重量非正 / 编码含非法字符 / 图片非 base64
    pub fn register_medication(&self, request: RegisterMedicationRequest) -> ApiResult<Medication> {
        let image = decode_image(request.image_base64.as_deref())?;
        let new_medication = NewMedication::new(request.name, request.weight, request.code, image)?;

        let medication = self.medication_repo.insert(&new_medication)?;
        info!(
            medication_id = medication.id,
            code = %medication.code,
            weight = medication.weight,
            "药品登记完成"
        );
        Ok(medication)
    }
}

/// 解码 base64 图片,空字符串视为无图片
fn decode_image(encoded: Option<&str>) -> Result<Option<Vec<u8>>, ValidationFailure> {
    match encoded.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => STANDARD
            .decode(s)
            .map(Some)
            .map_err(|e| ValidationFailure::InvalidImageEncoding(e.to_string())),
    }
}
