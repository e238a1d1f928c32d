//! Tests for configuration validation

use fairshare_priority::config::PluginConfig;
use fairshare_priority::core::PriorityWeights;

#[test]
fn test_default_config_is_valid() {
    let cfg = PluginConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.weights(), PriorityWeights::default());
    assert_eq!(cfg.fairshare_weight, 100_000);
    assert_eq!(cfg.urgency_midpoint, 16);
}

#[test]
fn test_zero_weight_rejected() {
    let cfg = PluginConfig {
        fairshare_weight: 0,
        ..PluginConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_midpoint_must_avoid_sentinels() {
    for midpoint in [0, 31, -4, 40] {
        let cfg = PluginConfig {
            urgency_midpoint: midpoint,
            ..PluginConfig::default()
        };
        assert!(cfg.validate().is_err(), "midpoint {midpoint} accepted");
    }
}

#[test]
fn test_zero_queue_depth_rejected() {
    let cfg = PluginConfig {
        update_queue_depth: 0,
        ..PluginConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_from_json_partial() {
    let cfg = PluginConfig::from_json_str(r#"{"fairshare_weight": 5000}"#).unwrap();
    assert_eq!(cfg.fairshare_weight, 5000);
    assert_eq!(cfg.urgency_midpoint, 16);
}

#[test]
fn test_config_from_json_invalid() {
    assert!(PluginConfig::from_json_str(r#"{"fairshare_weight": 0}"#).is_err());
    assert!(PluginConfig::from_json_str("not json").is_err());
}
