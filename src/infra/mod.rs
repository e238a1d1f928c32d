//! Infrastructure adapters for the host scheduler.

pub mod job;

pub use job::{InMemoryJob, JobException};
