//! Plugin configuration.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::priority::{
    PriorityWeights, DEFAULT_FAIRSHARE_WEIGHT, DEFAULT_URGENCY_MIDPOINT, URGENCY_EXPEDITE,
    URGENCY_HOLD,
};
use crate::core::AppResult;

/// Environment variable overriding [`PluginConfig::fairshare_weight`].
pub const ENV_FAIRSHARE_WEIGHT: &str = "FAIRSHARE_WEIGHT";
/// Environment variable overriding [`PluginConfig::urgency_midpoint`].
pub const ENV_URGENCY_MIDPOINT: &str = "FAIRSHARE_URGENCY_MIDPOINT";
/// Environment variable overriding [`PluginConfig::audit_capacity`].
pub const ENV_AUDIT_CAPACITY: &str = "FAIRSHARE_AUDIT_CAPACITY";
/// Environment variable overriding [`PluginConfig::update_queue_depth`].
pub const ENV_UPDATE_QUEUE_DEPTH: &str = "FAIRSHARE_UPDATE_QUEUE_DEPTH";

/// Plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Multiplier applied to the fairshare ratio.
    pub fairshare_weight: u32,
    /// Urgency treated as neutral.
    pub urgency_midpoint: i32,
    /// Audit events kept in memory; zero disables auditing.
    pub audit_capacity: usize,
    /// Pending bulk update requests before senders wait.
    pub update_queue_depth: usize,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            fairshare_weight: DEFAULT_FAIRSHARE_WEIGHT,
            urgency_midpoint: DEFAULT_URGENCY_MIDPOINT,
            audit_capacity: 1024,
            update_queue_depth: 64,
        }
    }
}

impl PluginConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.fairshare_weight == 0 {
            return Err("fairshare_weight must be greater than 0".into());
        }
        if self.urgency_midpoint <= URGENCY_HOLD || self.urgency_midpoint >= URGENCY_EXPEDITE {
            return Err(format!(
                "urgency_midpoint must be between {URGENCY_HOLD} and {URGENCY_EXPEDITE} exclusive"
            ));
        }
        if self.update_queue_depth == 0 {
            return Err("update_queue_depth must be greater than 0".into());
        }
        Ok(())
    }

    /// Priority weights derived from this configuration.
    #[must_use]
    pub const fn weights(&self) -> PriorityWeights {
        PriorityWeights {
            fairshare_weight: self.fairshare_weight,
            urgency_midpoint: self.urgency_midpoint,
        }
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading a `.env`
    /// file first if present. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails if a variable is set but does not parse, or the result is invalid.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(v) = env_var(ENV_FAIRSHARE_WEIGHT)? {
            cfg.fairshare_weight = v;
        }
        if let Some(v) = env_var(ENV_URGENCY_MIDPOINT)? {
            cfg.urgency_midpoint = v;
        }
        if let Some(v) = env_var(ENV_AUDIT_CAPACITY)? {
            cfg.audit_capacity = v;
        }
        if let Some(v) = env_var(ENV_UPDATE_QUEUE_DEPTH)? {
            cfg.update_queue_depth = v;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn env_var<T>(name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("cannot read {name}")),
    }
}
