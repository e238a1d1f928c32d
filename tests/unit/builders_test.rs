//! Tests for builder modules

use std::sync::Arc;

use fairshare_priority::builders::{build_plugin, build_plugin_with_sink};
use fairshare_priority::config::PluginConfig;
use fairshare_priority::core::{AccountingStore, AuditAction, InMemoryAuditSink, PluginError};
use fairshare_priority::infra::InMemoryJob;

#[test]
fn test_build_plugin_uses_config_weights() {
    let cfg = PluginConfig {
        fairshare_weight: 1000,
        ..PluginConfig::default()
    };
    let plugin = build_plugin(&cfg, Arc::new(AccountingStore::new())).unwrap();
    assert_eq!(plugin.weights().fairshare_weight, 1000);
}

#[test]
fn test_build_plugin_rejects_invalid_config() {
    let cfg = PluginConfig {
        update_queue_depth: 0,
        ..PluginConfig::default()
    };
    let result = build_plugin(&cfg, Arc::new(AccountingStore::new()));
    assert!(matches!(result, Err(PluginError::Config(_))));
}

#[test]
fn test_build_plugin_with_sink_records_decisions() {
    let sink = InMemoryAuditSink::new(16);
    let plugin = build_plugin_with_sink(
        &PluginConfig::default(),
        Arc::new(AccountingStore::new()),
        Box::new(sink.clone()),
    )
    .unwrap();

    let mut job = InMemoryJob::new(1);
    assert!(plugin.validate(&mut job, 5, None).is_err());
    assert_eq!(sink.count(AuditAction::Reject), 1);
}
