//! Builders to construct the plugin from configuration.

use std::sync::Arc;

use crate::config::PluginConfig;
use crate::core::{AccountingStore, AuditSink, FairsharePlugin, InMemoryAuditSink, PluginError};

/// Build a plugin over `store`, attaching an in-memory audit sink sized by
/// `audit_capacity` when it is non-zero.
///
/// # Errors
///
/// Returns [`PluginError::Config`] if the configuration is invalid.
pub fn build_plugin(
    cfg: &PluginConfig,
    store: Arc<AccountingStore>,
) -> Result<FairsharePlugin, PluginError> {
    cfg.validate().map_err(PluginError::Config)?;

    let plugin = FairsharePlugin::new(store, cfg.weights());
    if cfg.audit_capacity == 0 {
        return Ok(plugin);
    }
    Ok(plugin.with_audit(Box::new(InMemoryAuditSink::new(cfg.audit_capacity))))
}

/// Build a plugin over `store` reporting to a caller-provided audit sink.
///
/// # Errors
///
/// Returns [`PluginError::Config`] if the configuration is invalid.
pub fn build_plugin_with_sink(
    cfg: &PluginConfig,
    store: Arc<AccountingStore>,
    sink: Box<dyn AuditSink>,
) -> Result<FairsharePlugin, PluginError> {
    cfg.validate().map_err(PluginError::Config)?;
    Ok(FairsharePlugin::new(store, cfg.weights()).with_audit(sink))
}
