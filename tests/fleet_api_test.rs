// ==========================================
// API 层测试
// ==========================================
// 测试目标: 注册校验、可用机查询、装载查看、电量查询、药品登记
// ==========================================

use drone_dispatch::api::{ApiError, RegisterDroneRequest, RegisterMedicationRequest};
use drone_dispatch::app::AppState;
use drone_dispatch::domain::{DroneModel, DroneState, LoadOutcome, ValidationFailure};
use tempfile::NamedTempFile;

fn setup_state() -> (NamedTempFile, AppState) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new_without_demo_data(db_path).unwrap();
    (temp_file, state)
}

fn drone_request(serial: &str, model: &str, max_weight: i64, battery: i64) -> RegisterDroneRequest {
    RegisterDroneRequest {
        serial: serial.to_string(),
        model: model.to_string(),
        max_weight,
        battery,
    }
}

fn medication_request(name: &str, weight: i64, code: &str) -> RegisterMedicationRequest {
    RegisterMedicationRequest {
        name: name.to_string(),
        weight,
        code: code.to_string(),
        image_base64: None,
    }
}

// ==========================================
// 目录
// ==========================================

#[test]
fn test_catalog_listing() {
    let (_tmp, state) = setup_state();

    let models = state.fleet_api.list_models();
    let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Lightweight", "Middleweight", "Cruiserweight", "Heavyweight"]
    );

    let states = state.fleet_api.list_states();
    assert_eq!(states.len(), 6);
    assert_eq!(states[1].name, "LOADING");
}

// ==========================================
// 无人机注册
// ==========================================

#[test]
fn test_register_drone() {
    let (_tmp, state) = setup_state();

    let drone = state
        .fleet_api
        .register_drone(drone_request("SN-NEW", "Middleweight", 300, 90))
        .unwrap();

    assert_eq!(drone.model, DroneModel::Middleweight);
    assert_eq!(drone.state, DroneState::Idle);
    assert_eq!(state.fleet_api.list_drones().unwrap().len(), 1);
}

#[test]
fn test_register_drone_serial_too_long_creates_nothing() {
    let (_tmp, state) = setup_state();
    let serial = "S".repeat(101);

    let err = state
        .fleet_api
        .register_drone(drone_request(&serial, "Lightweight", 300, 90))
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::ValidationFailure(ValidationFailure::SerialTooLong { len: 101, max: 100 })
    ));
    assert!(state.fleet_api.list_drones().unwrap().is_empty());
}

#[test]
fn test_register_drone_unknown_model() {
    let (_tmp, state) = setup_state();

    let err = state
        .fleet_api
        .register_drone(drone_request("SN-X", "Featherweight", 300, 90))
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::ValidationFailure(ValidationFailure::UnknownModel(_))
    ));
}

#[test]
fn test_register_drone_duplicate_serial() {
    let (_tmp, state) = setup_state();
    state
        .fleet_api
        .register_drone(drone_request("SN-DUP", "Lightweight", 300, 90))
        .unwrap();

    let err = state
        .fleet_api
        .register_drone(drone_request("SN-DUP", "Heavyweight", 500, 100))
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

// ==========================================
// 可用机 / 电量
// ==========================================

#[test]
fn test_available_lists_only_idle() {
    let (_tmp, state) = setup_state();
    for serial in ["SN-1", "SN-2", "SN-3"] {
        state
            .fleet_api
            .register_drone(drone_request(serial, "Lightweight", 100, 100))
            .unwrap();
    }

    state.loading_api.load_drone("SN-2").unwrap();

    let available = state.fleet_api.list_available().unwrap();
    let serials: Vec<_> = available.iter().map(|d| d.serial.as_str()).collect();
    assert_eq!(serials, vec!["SN-1", "SN-3"]);
    assert!(available.iter().all(|d| d.state == DroneState::Idle));
}

#[test]
fn test_battery_query() {
    let (_tmp, state) = setup_state();
    state
        .fleet_api
        .register_drone(drone_request("SN-BAT", "Lightweight", 100, 64))
        .unwrap();

    let status = state.fleet_api.get_battery("SN-BAT").unwrap();
    assert_eq!(status.serial, "SN-BAT");
    assert_eq!(status.battery, 64);

    assert!(matches!(
        state.fleet_api.get_battery("SN-404"),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// 药品登记
// ==========================================

#[test]
fn test_register_medication_code_rules() {
    let (_tmp, state) = setup_state();

    let err = state
        .payload_api
        .register_medication(medication_request("Bad", 10, "AB CD"))
        .unwrap_err();
    match err {
        ApiError::ValidationFailure(ValidationFailure::InvalidMedicationCode { offending, .. }) => {
            assert_eq!(offending, vec![' ']);
        }
        other => panic!("Expected InvalidMedicationCode, got {:?}", other),
    }

    let med = state
        .payload_api
        .register_medication(medication_request("Good", 10, "AB-12_CD"))
        .unwrap();
    assert_eq!(med.code, "AB-12_CD");
    assert!(med.drone_id.is_none());
    assert!(!med.done);
}

#[test]
fn test_oversized_weights_rejected_at_registration() {
    let (_tmp, state) = setup_state();

    let err = state
        .payload_api
        .register_medication(medication_request("Heavy", i64::MAX, "HEAVY"))
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::ValidationFailure(ValidationFailure::WeightTooLarge { field: "weight", .. })
    ));

    let err = state
        .fleet_api
        .register_drone(drone_request("SN-BIG", "Heavyweight", i64::MAX, 100))
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::ValidationFailure(ValidationFailure::WeightTooLarge { field: "max_weight", .. })
    ));

    assert_eq!(state.fleet_api.fleet_summary().unwrap().medications, 0);
    assert!(state.fleet_api.list_drones().unwrap().is_empty());
}

#[test]
fn test_register_medication_with_image() {
    let (_tmp, state) = setup_state();
    let mut request = medication_request("Pictured", 12, "PIC_1");
    request.image_base64 = Some("iVBORw0KGgo=".to_string());

    let med = state.payload_api.register_medication(request).unwrap();
    assert_eq!(
        med.image.as_deref(),
        Some(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a][..])
    );

    let mut bad = medication_request("Broken", 12, "PIC_2");
    bad.image_base64 = Some("%%%".to_string());
    assert!(matches!(
        state.payload_api.register_medication(bad),
        Err(ApiError::ValidationFailure(ValidationFailure::InvalidImageEncoding(_)))
    ));
}

// ==========================================
// 装载 / 查看
// ==========================================

#[test]
fn test_inspect_load_reports_items_and_weight() {
    let (_tmp, state) = setup_state();
    state
        .fleet_api
        .register_drone(drone_request("SN-INS", "Lightweight", 100, 100))
        .unwrap();
    for (i, w) in [60, 50, 20].iter().enumerate() {
        state
            .payload_api
            .register_medication(medication_request("Med", *w, &format!("M-{}", i)))
            .unwrap();
    }

    let before = state.loading_api.inspect_load("SN-INS").unwrap();
    assert!(before.items.is_empty());
    assert_eq!(before.total_weight, 0);

    let result = state.loading_api.load_drone("SN-INS").unwrap();
    assert_eq!(result.outcome, LoadOutcome::WeightLimitReached);

    let after = state.loading_api.inspect_load("SN-INS").unwrap();
    assert_eq!(after.total_weight, 80);
    assert_eq!(after.items.len(), 2);

    // 查看不改变状态
    assert_eq!(
        state.fleet_api.get_drone("SN-INS").unwrap().state,
        DroneState::Loaded
    );
}

#[test]
fn test_inspect_ignores_battery() {
    let (_tmp, state) = setup_state();
    state
        .fleet_api
        .register_drone(drone_request("SN-FLAT", "Lightweight", 100, 0))
        .unwrap();

    let inspection = state.loading_api.inspect_load("SN-FLAT").unwrap();
    assert_eq!(inspection.total_weight, 0);
}

#[test]
fn test_unknown_serial_is_not_found_everywhere() {
    let (_tmp, state) = setup_state();

    assert!(matches!(
        state.loading_api.load_drone("SN-404"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.loading_api.inspect_load("SN-404"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.loading_api.load_history("SN-404"),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_load_history_and_summary() {
    let (_tmp, state) = setup_state();
    state
        .fleet_api
        .register_drone(drone_request("SN-H", "Lightweight", 100, 100))
        .unwrap();
    state
        .payload_api
        .register_medication(medication_request("Med", 30, "H-1"))
        .unwrap();
    state
        .payload_api
        .register_medication(medication_request("Med", 30, "H-2"))
        .unwrap();

    state.loading_api.load_drone("SN-H").unwrap();
    let history = state.loading_api.load_history("SN-H").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].assigned_count, 2);

    let summary = state.fleet_api.fleet_summary().unwrap();
    assert_eq!(summary.drones, 1);
    assert_eq!(summary.loaded, 1);
    assert_eq!(summary.medications, 2);
    assert_eq!(summary.unassigned_medications, 0);
}
