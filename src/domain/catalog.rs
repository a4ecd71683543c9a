// ==========================================
// 药品配送无人机调度系统 - 目录（机型 / 状态）
// ==========================================
// 启动时从数据库加载一次,校验与枚举一致后只读共享
// ==========================================

use crate::domain::error::ValidationFailure;
use crate::domain::types::{DroneModel, DroneState};
use serde::{Deserialize, Serialize};

/// 目录条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
}

// ==========================================
// Catalog - 不可变目录查找表
// ==========================================
#[derive(Debug, Clone)]
pub struct Catalog {
    models: Vec<CatalogEntry>,
    states: Vec<CatalogEntry>,
}

impl Catalog {
    /// 由数据库行构造目录
    ///
    /// 每一行的 (id, name) 必须与对应枚举一致,且枚举中的每一项都必须出现
    pub fn from_entries(
        models: Vec<CatalogEntry>,
        states: Vec<CatalogEntry>,
    ) -> Result<Self, ValidationFailure> {
        for entry in &models {
            match DroneModel::from_name(&entry.name) {
                Some(m) if m.id() == entry.id => {}
                _ => return Err(ValidationFailure::UnknownModel(entry.name.clone())),
            }
        }
        for entry in &states {
            match DroneState::from_name(&entry.name) {
                Some(s) if s.id() == entry.id => {}
                _ => return Err(ValidationFailure::UnknownState(entry.name.clone())),
            }
        }
        if let Some(missing) = DroneModel::ALL
            .iter()
            .find(|m| !models.iter().any(|e| e.id == m.id()))
        {
            return Err(ValidationFailure::UnknownModel(missing.name().to_string()));
        }
        if let Some(missing) = DroneState::ALL
            .iter()
            .find(|s| !states.iter().any(|e| e.id == s.id()))
        {
            return Err(ValidationFailure::UnknownState(missing.name().to_string()));
        }

        Ok(Self { models, states })
    }

    /// 按枚举生成的标准目录（写库用）
    pub fn standard() -> Self {
        Self {
            models: DroneModel::ALL
                .iter()
                .map(|m| CatalogEntry {
                    id: m.id(),
                    name: m.name().to_string(),
                })
                .collect(),
            states: DroneState::ALL
                .iter()
                .map(|s| CatalogEntry {
                    id: s.id(),
                    name: s.name().to_string(),
                })
                .collect(),
        }
    }

    pub fn models(&self) -> &[CatalogEntry] {
        &self.models
    }

    pub fn states(&self) -> &[CatalogEntry] {
        &self.states
    }

    /// 按名称解析机型
    pub fn resolve_model(&self, name: &str) -> Result<DroneModel, ValidationFailure> {
        self.models
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| DroneModel::from_id(e.id))
            .ok_or_else(|| ValidationFailure::UnknownModel(name.to_string()))
    }
}
