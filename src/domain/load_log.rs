// ==========================================
// 药品配送无人机调度系统 - 装载日志领域模型
// ==========================================
// 红线: 每次装载请求（含电量拒绝）都必须留痕
// 对齐: load_log 表
// ==========================================

use crate::domain::types::LoadOutcome;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// LoadLog - 装载日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadLog {
    pub log_id: String,         // 日志ID (uuid)
    pub drone_id: i64,
    pub serial: String,
    pub outcome: LoadOutcome,
    pub assigned_count: i64,    // 本次新分配药品数
    pub load: i64,              // 本次结束时载重 (克)
    pub limit_weight: i64,      // 最大载重 (克)
    pub detail: Option<String>, // 补充说明 (如分配的药品ID)
    pub action_ts: NaiveDateTime,
}
