// ==========================================
// 药品配送无人机调度系统 - 演示数据
// ==========================================
// 职责: 空库时写入演示机队（10 架无人机 + 50 种药品）
// 规则: 无人机全部 IDLE、满电,载重 400-500 克
//       药品重量 20-50 克,编码 40 位
// ==========================================

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::drone::NewDrone;
use crate::domain::medication::{code_alphabet, NewMedication};
use crate::domain::types::DroneModel;
use crate::repository::error::RepositoryResult;
use crate::repository::{DroneRepository, MedicationRepository};

pub const DEMO_DRONE_COUNT: usize = 10;
pub const DEMO_MEDICATION_COUNT: usize = 50;
pub const DEMO_CODE_LEN: usize = 40;

const DEMO_MEDICATION_NAMES: [&str; 25] = [
    "Vitamin D",
    "Amoxicillin",
    "Levothyroxine",
    "Lisinopril",
    "Ibuprofen",
    "Amlodipine",
    "Albuterol HFA",
    "Prednisone",
    "Gabapentin",
    "Benzonatate",
    "Azithromycin",
    "Atorvastatin",
    "Cetirizine",
    "Losartan",
    "Cephalexin",
    "Metformin",
    "Folic Acid",
    "Hydrochlorothiazide",
    "Escitalopram",
    "Fluconazole",
    "Sertraline",
    "Furosemide",
    "Omeprazole",
    "Meloxicam",
    "Famotidine",
];

/// 演示数据写入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub drones: usize,
    pub medications: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.drones == 0 && self.medications == 0
    }
}

/// 空库时写入演示机队,非空库不做任何变更
pub fn seed_demo_fleet<R: Rng>(
    drone_repo: &DroneRepository,
    medication_repo: &MedicationRepository,
    rng: &mut R,
) -> RepositoryResult<SeedReport> {
    if drone_repo.count()? > 0 || medication_repo.count()? > 0 {
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();

    for drone in demo_drones(&mut *rng)? {
        drone_repo.insert(&drone)?;
        report.drones += 1;
    }

    report.medications = medication_repo.batch_insert(&demo_medications(&mut *rng)?)?;

    info!(
        drones = report.drones,
        medications = report.medications,
        "演示机队写入完成"
    );
    Ok(report)
}

/// 演示无人机（机型轮换,序列号为 UUID）
pub fn demo_drones<R: Rng>(rng: &mut R) -> RepositoryResult<Vec<NewDrone>> {
    let mut drones = Vec::with_capacity(DEMO_DRONE_COUNT);
    for i in 0..DEMO_DRONE_COUNT {
        let model = DroneModel::ALL[i % DroneModel::ALL.len()];
        let max_weight = rng.gen_range(400..=500);
        drones.push(NewDrone::new(
            uuid::Uuid::new_v4().to_string(),
            max_weight,
            100,
            model,
        )?);
    }
    Ok(drones)
}

/// 演示药品（按登记顺序）
pub fn demo_medications<R: Rng>(rng: &mut R) -> RepositoryResult<Vec<NewMedication>> {
    let alphabet = code_alphabet();
    let mut medications = Vec::with_capacity(DEMO_MEDICATION_COUNT);
    for i in 0..DEMO_MEDICATION_COUNT {
        let name = DEMO_MEDICATION_NAMES[i % DEMO_MEDICATION_NAMES.len()];
        let code: String = (0..DEMO_CODE_LEN)
            .filter_map(|_| alphabet.choose(&mut *rng).copied())
            .collect();
        medications.push(NewMedication::new(name, rng.gen_range(20..=50), code, None)?);
    }
    Ok(medications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_demo_drones_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let drones = demo_drones(&mut rng).unwrap();

        assert_eq!(drones.len(), DEMO_DRONE_COUNT);
        for d in &drones {
            assert!((400..=500).contains(&d.max_weight()));
            assert_eq!(d.battery(), 100);
            assert_eq!(d.serial().len(), 36);
        }
        // 四种机型都出现
        for model in DroneModel::ALL {
            assert!(drones.iter().any(|d| d.model() == model));
        }
    }

    #[test]
    fn test_demo_medications_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let medications = demo_medications(&mut rng).unwrap();

        assert_eq!(medications.len(), DEMO_MEDICATION_COUNT);
        for m in &medications {
            assert!((20..=50).contains(&m.weight()));
            assert_eq!(m.code().chars().count(), DEMO_CODE_LEN);
        }
    }
}
