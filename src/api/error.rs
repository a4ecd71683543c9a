// ==========================================
// 药品配送无人机调度系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// 说明: 电量不足 / 达到载重上限不是错误,通过 LoadResult.outcome 返回
// ==========================================

use crate::domain::error::ValidationFailure;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationFailure(#[from] ValidationFailure),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::ValidationError(failure) => ApiError::ValidationFailure(failure),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::drone_not_found("SN-404");
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Drone"));
                assert!(msg.contains("SN-404"));
            }
            _ => panic!("Expected NotFound"),
        }

        let repo_err = RepositoryError::UniqueConstraintViolation(
            "UNIQUE constraint failed: drone.serial".to_string(),
        );
        let api_err: ApiError = repo_err.into();
        assert!(matches!(api_err, ApiError::BusinessRuleViolation(_)));

        let repo_err = RepositoryError::LockError("poisoned".to_string());
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::DatabaseConnectionError(msg) => assert!(msg.contains("poisoned")),
            _ => panic!("Expected DatabaseConnectionError"),
        }
    }

    #[test]
    fn test_validation_failure_passes_through() {
        let repo_err: RepositoryError = ValidationFailure::EmptySerial.into();
        let api_err: ApiError = repo_err.into();
        assert!(matches!(
            api_err,
            ApiError::ValidationFailure(ValidationFailure::EmptySerial)
        ));

        let api_err: ApiError = ValidationFailure::BatteryOutOfRange(101).into();
        assert!(api_err.to_string().contains("101"));
    }

    #[test]
    fn test_state_transition_keeps_labels() {
        let repo_err = RepositoryError::InvalidStateTransition {
            from: "IDLE".to_string(),
            to: "DELIVERED".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "IDLE");
                assert_eq!(to, "DELIVERED");
            }
            _ => panic!("Expected InvalidStateTransition"),
        }
    }
}
