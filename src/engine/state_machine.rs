// ==========================================
// 药品配送无人机调度系统 - 无人机状态机
// ==========================================
// 状态线性顺序: IDLE → LOADING → LOADED → DELIVERING → DELIVERED → RETURNING → IDLE
// 装载引擎驱动的转换:
//   任意状态 → LOADING（进入装载流程）
//   LOADING → LOADED（装载流程结束,即使未分配任何药品）
// 其余转换只允许沿线性顺序前进一步
// ==========================================

use crate::domain::types::DroneState;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// DroneStateMachine - 状态转换规则
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DroneStateMachine;

impl DroneStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// 判断转换是否允许
    pub fn can_transition(&self, from: DroneState, to: DroneState) -> bool {
        match to {
            DroneState::Loading => true,
            _ => from.next() == to,
        }
    }

    /// 校验转换
    ///
    /// # 返回
    /// - Ok(to): 允许
    /// - Err(InvalidStateTransition): 不允许
    pub fn transition(&self, from: DroneState, to: DroneState) -> RepositoryResult<DroneState> {
        if self.can_transition(from, to) {
            Ok(to)
        } else {
            Err(RepositoryError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}
