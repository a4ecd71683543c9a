// ==========================================
// 药品配送无人机调度系统 - 领域类型定义
// ==========================================
// 机型目录 / 状态目录: 固定枚举集合,启动时写入一次,之后只读
// 序列化格式与数据库 name 列一致
// ==========================================

use crate::domain::error::ValidationFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 重量上限（克）,适用于药品重量与无人机最大载重
pub const MAX_WEIGHT_GRAMS: i64 = 1_000_000;

/// 校验重量: 必须为正且不超过 MAX_WEIGHT_GRAMS
pub fn validate_weight(field: &'static str, value: i64) -> Result<(), ValidationFailure> {
    if value <= 0 {
        return Err(ValidationFailure::NonPositiveWeight { field, value });
    }
    if value > MAX_WEIGHT_GRAMS {
        return Err(ValidationFailure::WeightTooLarge {
            field,
            value,
            max: MAX_WEIGHT_GRAMS,
        });
    }
    Ok(())
}

// ==========================================
// 无人机机型 (Drone Model)
// ==========================================
// 目录 id 与声明顺序一致 (1..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneModel {
    Lightweight,   // 轻型
    Middleweight,  // 中型
    Cruiserweight, // 巡航型
    Heavyweight,   // 重型
}

impl DroneModel {
    /// 全部机型（按目录 id 顺序）
    pub const ALL: [DroneModel; 4] = [
        DroneModel::Lightweight,
        DroneModel::Middleweight,
        DroneModel::Cruiserweight,
        DroneModel::Heavyweight,
    ];

    /// 目录 id
    pub fn id(&self) -> i64 {
        match self {
            DroneModel::Lightweight => 1,
            DroneModel::Middleweight => 2,
            DroneModel::Cruiserweight => 3,
            DroneModel::Heavyweight => 4,
        }
    }

    /// 目录名称
    pub fn name(&self) -> &'static str {
        match self {
            DroneModel::Lightweight => "Lightweight",
            DroneModel::Middleweight => "Middleweight",
            DroneModel::Cruiserweight => "Cruiserweight",
            DroneModel::Heavyweight => "Heavyweight",
        }
    }

    /// 从目录名称解析（大小写敏感，与目录保持一致）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }
}

impl fmt::Display for DroneModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 无人机状态 (Drone State)
// ==========================================
// 线性顺序: IDLE → LOADING → LOADED → DELIVERING → DELIVERED → RETURNING
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroneState {
    Idle,       // 空闲,可装载
    Loading,    // 装载中
    Loaded,     // 已装载
    Delivering, // 配送中
    Delivered,  // 已送达
    Returning,  // 返航中
}

impl DroneState {
    /// 全部状态（按线性顺序）
    pub const ALL: [DroneState; 6] = [
        DroneState::Idle,
        DroneState::Loading,
        DroneState::Loaded,
        DroneState::Delivering,
        DroneState::Delivered,
        DroneState::Returning,
    ];

    /// 目录 id (IDLE=1 … RETURNING=6)
    pub fn id(&self) -> i64 {
        match self {
            DroneState::Idle => 1,
            DroneState::Loading => 2,
            DroneState::Loaded => 3,
            DroneState::Delivering => 4,
            DroneState::Delivered => 5,
            DroneState::Returning => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }

    /// 线性顺序中的下一个状态（RETURNING 之后回到 IDLE）
    pub fn next(&self) -> DroneState {
        match self {
            DroneState::Idle => DroneState::Loading,
            DroneState::Loading => DroneState::Loaded,
            DroneState::Loaded => DroneState::Delivering,
            DroneState::Delivering => DroneState::Delivered,
            DroneState::Delivered => DroneState::Returning,
            DroneState::Returning => DroneState::Idle,
        }
    }

    /// 是否可作为装载候选（仅 IDLE）
    pub fn is_available(&self) -> bool {
        matches!(self, DroneState::Idle)
    }
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 装载结果类型 (Load Outcome)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadOutcome {
    Loaded,              // 全部候选均已装入（或无候选）
    WeightLimitReached,  // 部分候选因重量上限被跳过
    BatteryBelowMinimum, // 电量不足,未做任何变更
}

impl LoadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded => "LOADED",
            LoadOutcome::WeightLimitReached => "WEIGHT_LIMIT_REACHED",
            LoadOutcome::BatteryBelowMinimum => "BATTERY_BELOW_MINIMUM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOADED" => Some(LoadOutcome::Loaded),
            "WEIGHT_LIMIT_REACHED" => Some(LoadOutcome::WeightLimitReached),
            "BATTERY_BELOW_MINIMUM" => Some(LoadOutcome::BatteryBelowMinimum),
            _ => None,
        }
    }

    /// 返回给调用方的 message 字段
    pub fn message(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded => "",
            LoadOutcome::WeightLimitReached => "weight limit reached",
            LoadOutcome::BatteryBelowMinimum => "battery below minimum",
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
