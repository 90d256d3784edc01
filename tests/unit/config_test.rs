//! Tests for configuration validation

use gang_scheduler_core::config::SnapshotConfig;

#[test]
fn test_snapshot_config_validation() {
    let valid = SnapshotConfig::default();
    assert!(valid.validate().is_ok());
}

#[test]
fn test_snapshot_config_empty_weight_key() {
    let invalid = SnapshotConfig {
        namespace_weight_key: String::new(),
        ..SnapshotConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_snapshot_config_non_positive_weight() {
    for weight in [0, -1] {
        let invalid = SnapshotConfig {
            default_namespace_weight: weight,
            ..SnapshotConfig::default()
        };
        assert!(invalid.validate().is_err());
    }
}

#[test]
fn test_snapshot_config_from_json() {
    let json = r#"{
        "namespace_weight_key": "example.com/weight",
        "default_namespace_weight": 5,
        "skip_not_ready_nodes": true,
        "log_filter": "gang_scheduler_core=debug"
    }"#;

    let cfg = SnapshotConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.namespace_weight_key, "example.com/weight");
    assert_eq!(cfg.default_namespace_weight, 5);
    assert!(cfg.skip_not_ready_nodes);
    assert_eq!(cfg.log_filter.as_deref(), Some("gang_scheduler_core=debug"));
}

#[test]
fn test_snapshot_config_from_json_invalid() {
    let json = r#"{"namespace_weight_key": ""}"#;
    let result = SnapshotConfig::from_json_str(json);
    assert!(result.is_err());
}

#[test]
fn test_snapshot_config_round_trips_through_json() {
    let cfg = SnapshotConfig {
        skip_not_ready_nodes: true,
        ..SnapshotConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SnapshotConfig::from_json_str(&json).unwrap(), cfg);
}
