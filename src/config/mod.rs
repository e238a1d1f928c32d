//! Configuration models for the plugin.

pub mod plugin;

pub use plugin::PluginConfig;
