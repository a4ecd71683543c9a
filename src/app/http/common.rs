use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// 公共工具：响应包装、错误映射、阻塞调用
// ==========================================

/// 成功响应包装（顶层 result 字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

impl<T> Envelope<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

pub(crate) fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::ValidationFailure(_) => "VALIDATION_FAILURE",
        ApiError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
        ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
        ApiError::DatabaseError(_) => "DATABASE_ERROR",
        ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
        ApiError::InternalError(_) => "INTERNAL_ERROR",
        ApiError::Other(_) => "OTHER_ERROR",
    }
}

pub(crate) fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::ValidationFailure(_) => StatusCode::BAD_REQUEST,
        ApiError::InvalidStateTransition { .. } | ApiError::BusinessRuleViolation(_) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 将ApiError转换为HTTP错误响应
pub(crate) fn map_api_error(err: ApiError) -> HttpResponse {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "请求处理失败");
    } else {
        tracing::debug!(error = %err, "请求被拒绝");
    }

    let details = match &err {
        ApiError::InvalidStateTransition { from, to } => {
            Some(serde_json::json!({ "from": from, "to": to }))
        }
        _ => None,
    };

    HttpResponse::build(status).json(ErrorResponse {
        code: error_code(&err).to_string(),
        message: err.to_string(),
        details,
    })
}

/// 在阻塞线程池执行 API 调用（仓储层为同步 rusqlite）
pub(super) async fn blocking<F, T>(op: &'static str, f: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = web::block(move || {
        let _perf = crate::perf::PerfGuard::new(op);
        f()
    })
    .await;

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(map_api_error(err)),
        Err(e) => Err(HttpResponse::InternalServerError().json(ErrorResponse::new(
            "INTERNAL_ERROR",
            format!("任务执行失败: {}", e),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ValidationFailure;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ApiError::NotFound("Drone".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ApiError::ValidationFailure(ValidationFailure::EmptySerial)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ApiError::BusinessRuleViolation("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ApiError::DatabaseError("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            error_code(&ApiError::ValidationFailure(ValidationFailure::EmptySerial)),
            "VALIDATION_FAILURE"
        );
        assert_eq!(
            error_code(&ApiError::InvalidStateTransition {
                from: "IDLE".into(),
                to: "DELIVERED".into(),
            }),
            "INVALID_STATE_TRANSITION"
        );
    }
}
