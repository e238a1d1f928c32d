//! Builders to construct plugin components from configuration.

pub mod plugin_builder;

pub use plugin_builder::{build_plugin, build_plugin_with_sink};
