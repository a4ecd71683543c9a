// ==========================================
// 药品配送无人机调度系统 - 无人机领域模型
// ==========================================
// 红线: 序列号 ≤ 100 字符,构造时校验
// ==========================================

use crate::domain::error::ValidationFailure;
use crate::domain::types::{validate_weight, DroneModel, DroneState};
use serde::{Deserialize, Serialize};

/// 序列号最大长度（字符数）
pub const MAX_SERIAL_LEN: usize = 100;

// ==========================================
// Drone - 无人机（含目录名称）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    pub id: i64,
    pub serial: String,
    pub max_weight: i64, // 最大载重 (克)
    pub battery: i64,    // 电量 (%)
    pub model: DroneModel,
    pub state: DroneState,
}

// ==========================================
// NewDrone - 待注册无人机
// ==========================================
// 只能通过 NewDrone::new 构造,保证落库前已校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrone {
    serial: String,
    max_weight: i64,
    battery: i64,
    model: DroneModel,
}

impl NewDrone {
    /// 构造待注册无人机
    ///
    /// # 校验
    /// - serial 非空且不超过 100 字符
    /// - max_weight ∈ (0, MAX_WEIGHT_GRAMS]
    /// - battery ∈ [0, 100]
    pub fn new(
        serial: impl Into<String>,
        max_weight: i64,
        battery: i64,
        model: DroneModel,
    ) -> Result<Self, ValidationFailure> {
        let serial = serial.into();
        validate_serial(&serial)?;

        validate_weight("max_weight", max_weight)?;
        if !(0..=100).contains(&battery) {
            return Err(ValidationFailure::BatteryOutOfRange(battery));
        }

        Ok(Self {
            serial,
            max_weight,
            battery,
            model,
        })
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn max_weight(&self) -> i64 {
        self.max_weight
    }

    pub fn battery(&self) -> i64 {
        self.battery
    }

    pub fn model(&self) -> DroneModel {
        self.model
    }

    /// 注册时的初始状态
    pub fn initial_state(&self) -> DroneState {
        DroneState::Idle
    }
}

/// 校验序列号（按字符计数,非字节）
pub fn validate_serial(serial: &str) -> Result<(), ValidationFailure> {
    if serial.trim().is_empty() {
        return Err(ValidationFailure::EmptySerial);
    }
    let len = serial.chars().count();
    if len > MAX_SERIAL_LEN {
        return Err(ValidationFailure::SerialTooLong {
            len,
            max: MAX_SERIAL_LEN,
        });
    }
    Ok(())
}
