// ==========================================
// 药品配送无人机调度系统 - 领域校验错误
// ==========================================
// 实体构造时校验,失败即拒绝,不落库
// ==========================================

use thiserror::Error;

/// 实体构造校验失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("序列号不能为空")]
    EmptySerial,

    #[error("序列号过长: len={len}, max={max}")]
    SerialTooLong { len: usize, max: usize },

    #[error("药品编码包含非法字符: code={code}, offending={offending:?}")]
    InvalidMedicationCode { code: String, offending: Vec<char> },

    #[error("药品名称不能为空")]
    EmptyMedicationName,

    #[error("{field} 必须为正整数: {value}")]
    NonPositiveWeight { field: &'static str, value: i64 },

    #[error("{field} 超出上限: {value} > {max}")]
    WeightTooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("电量超出范围 (0-100): {0}")]
    BatteryOutOfRange(i64),

    #[error("未知机型: {0}")]
    UnknownModel(String),

    #[error("未知状态: {0}")]
    UnknownState(String),

    #[error("图片编码无效: {0}")]
    InvalidImageEncoding(String),
}
