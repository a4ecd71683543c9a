// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取、默认值回退、覆写功能的正确性
// ==========================================

mod test_helpers;

use drone_dispatch::app::AppState;
use drone_dispatch::config::{config_keys, defaults, ConfigManager};
use test_helpers::{create_test_db, open_test_connection};

#[test]
fn test_defaults_on_empty_table() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(config.get_min_battery_pct().unwrap(), 25);
    assert_eq!(config.get_server_host().unwrap(), defaults::SERVER_HOST);
    assert_eq!(config.get_server_port().unwrap(), 5000);
    assert_eq!(config.get_heartbeat_interval_secs().unwrap(), 10);
    assert!(config.get_seed_demo_fleet().unwrap());
    assert_eq!(config.get_config_snapshot().unwrap(), "{}");
}

#[test]
fn test_overrides_are_read_back() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config
        .set_global_config_value(config_keys::MIN_BATTERY_PCT, "40")
        .unwrap();
    config
        .set_global_config_value(config_keys::SERVER_PORT, "8081")
        .unwrap();
    config
        .set_global_config_value(config_keys::SEED_DEMO_FLEET, "off")
        .unwrap();

    assert_eq!(config.get_min_battery_pct().unwrap(), 40);
    assert_eq!(config.get_server_port().unwrap(), 8081);
    assert!(!config.get_seed_demo_fleet().unwrap());

    // UPSERT 覆盖旧值
    config
        .set_global_config_value(config_keys::MIN_BATTERY_PCT, "30")
        .unwrap();
    assert_eq!(config.get_min_battery_pct().unwrap(), 30);
    assert_eq!(
        config
            .get_global_config_value(config_keys::MIN_BATTERY_PCT)
            .unwrap()
            .as_deref(),
        Some("30")
    );
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config
        .set_global_config_value(config_keys::MIN_BATTERY_PCT, "quarter")
        .unwrap();
    config
        .set_global_config_value(config_keys::SERVER_PORT, "99999")
        .unwrap();
    assert_eq!(config.get_min_battery_pct().unwrap(), 25);
    assert_eq!(config.get_server_port().unwrap(), defaults::SERVER_PORT);

    // 超出 0-100
    config
        .set_global_config_value(config_keys::MIN_BATTERY_PCT, "150")
        .unwrap();
    assert_eq!(config.get_min_battery_pct().unwrap(), 25);
}

#[test]
fn test_snapshot_contains_overrides() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let config = ConfigManager::from_connection(conn).unwrap();

    config
        .set_global_config_value(config_keys::SERVER_HOST, "127.0.0.1")
        .unwrap();

    let snapshot: serde_json::Value =
        serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["server/host"], "127.0.0.1");
}

#[test]
fn test_app_state_uses_configured_battery_floor_and_seed_switch() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    {
        let config = ConfigManager::new(&db_path).unwrap();
        config
            .set_global_config_value(config_keys::MIN_BATTERY_PCT, "50")
            .unwrap();
        config
            .set_global_config_value(config_keys::SEED_DEMO_FLEET, "false")
            .unwrap();
    }

    let state = AppState::new(db_path).unwrap();
    assert!(state.seed_report.is_empty());
    assert!(state.fleet_api.list_drones().unwrap().is_empty());
    assert_eq!(state.config_manager.get_min_battery_pct().unwrap(), 50);
}

#[test]
fn test_demo_fleet_seeded_once() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let first = AppState::new(db_path.clone()).unwrap();
    assert_eq!(first.seed_report.drones, 10);
    assert_eq!(first.seed_report.medications, 50);

    let drones = first.fleet_api.list_drones().unwrap();
    assert_eq!(drones.len(), 10);
    assert!(drones.iter().all(|d| d.battery == 100 && (400..=500).contains(&d.max_weight)));
    drop(first);

    // 非空库不再写入
    let second = AppState::new(db_path).unwrap();
    assert!(second.seed_report.is_empty());
    assert_eq!(second.fleet_api.fleet_summary().unwrap().medications, 50);
}
