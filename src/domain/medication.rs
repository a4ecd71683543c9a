// ==========================================
// 药品配送无人机调度系统 - 药品领域模型
// ==========================================
// 红线: code 只允许 A-Z / 0-9 / '-' / '_'
// drone_id = None 表示未分配,可被装载
// ==========================================

use crate::domain::error::ValidationFailure;
use crate::domain::types::validate_weight;
use serde::{Deserialize, Serialize};

/// 药品编码允许的标点
const CODE_PUNCTUATION: [char; 2] = ['-', '_'];

// ==========================================
// Medication - 药品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub weight: i64, // 重量 (克)
    pub code: String,
    pub done: bool, // 配送完成标记
    #[serde(skip)]
    pub image: Option<Vec<u8>>, // 药品包装图片,核心逻辑不解析
    pub drone_id: Option<i64>,
}

impl Medication {
    pub fn is_unassigned(&self) -> bool {
        self.drone_id.is_none()
    }
}

// ==========================================
// NewMedication - 待登记药品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedication {
    name: String,
    weight: i64,
    code: String,
    image: Option<Vec<u8>>,
}

impl NewMedication {
    /// 构造待登记药品（未分配,done=false）
    pub fn new(
        name: impl Into<String>,
        weight: i64,
        code: impl Into<String>,
        image: Option<Vec<u8>>,
    ) -> Result<Self, ValidationFailure> {
        let name = name.into();
        let code = code.into();

        if name.trim().is_empty() {
            return Err(ValidationFailure::EmptyMedicationName);
        }
        validate_weight("weight", weight)?;
        validate_medication_code(&code)?;

        Ok(Self {
            name,
            weight,
            code,
            image,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }
}

/// 字符是否允许出现在药品编码中
pub fn is_allowed_code_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || CODE_PUNCTUATION.contains(&c)
}

/// 校验药品编码
///
/// 返回的错误中包含全部非法字符（去重,保持出现顺序）
pub fn validate_medication_code(code: &str) -> Result<(), ValidationFailure> {
    let mut offending: Vec<char> = Vec::new();
    for c in code.chars().filter(|c| !is_allowed_code_char(*c)) {
        if !offending.contains(&c) {
            offending.push(c);
        }
    }

    if offending.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure::InvalidMedicationCode {
            code: code.to_string(),
            offending,
        })
    }
}

/// 编码字母表（演示数据生成用）
pub fn code_alphabet() -> Vec<char> {
    ('A'..='Z')
        .chain('0'..='9')
        .chain(CODE_PUNCTUATION)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_with_space_rejected() {
        let err = NewMedication::new("Ibuprofen", 30, "AB CD", None).unwrap_err();
        match err {
            ValidationFailure::InvalidMedicationCode { code, offending } => {
                assert_eq!(code, "AB CD");
                assert_eq!(offending, vec![' ']);
            }
            other => panic!("Expected InvalidMedicationCode, got {:?}", other),
        }
    }

    #[test]
    fn test_code_with_allowed_punctuation_accepted() {
        let med = NewMedication::new("Ibuprofen", 30, "AB-12_CD", None).unwrap();
        assert_eq!(med.code(), "AB-12_CD");
    }

    #[test]
    fn test_lowercase_rejected() {
        assert!(validate_medication_code("abc").is_err());
        assert!(validate_medication_code("ÄBC").is_err());
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        assert_eq!(
            NewMedication::new("Aspirin", 0, "ASP", None).unwrap_err(),
            ValidationFailure::NonPositiveWeight {
                field: "weight",
                value: 0
            }
        );
    }

    #[test]
    fn test_weight_upper_bound() {
        use crate::domain::types::MAX_WEIGHT_GRAMS;

        assert!(NewMedication::new("Saline", MAX_WEIGHT_GRAMS, "SAL", None).is_ok());
        assert_eq!(
            NewMedication::new("Saline", i64::MAX, "SAL", None).unwrap_err(),
            ValidationFailure::WeightTooLarge {
                field: "weight",
                value: i64::MAX,
                max: MAX_WEIGHT_GRAMS
            }
        );
    }

    #[test]
    fn test_alphabet_is_valid() {
        let alphabet: String = code_alphabet().into_iter().collect();
        assert_eq!(alphabet.len(), 38);
        assert!(validate_medication_code(&alphabet).is_ok());
    }
}
