// ==========================================
// 药品配送无人机调度系统 - 单机互斥锁
// ==========================================
// 同一无人机的装载流程串行执行,不同无人机互不阻塞
// 锁按已解析的无人机 id 分配,表大小以已注册机队为上限
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 按无人机 id 分配的互斥锁表
#[derive(Debug, Default)]
pub struct DroneLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl DroneLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取（必要时创建）指定无人机的锁
    ///
    /// 调用方须先确认 drone_id 存在；返回的 Arc 由调用方加锁,
    /// 锁表本身只在查找/插入期间持有
    pub fn lock_for(&self, drone_id: i64) -> RepositoryResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(locks
            .entry(drone_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// 已创建锁的数量
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
