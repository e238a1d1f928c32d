//! # Fairshare Priority
//!
//! Admission control and priority assignment for a batch job scheduler,
//! driven by per-user, per-bank fairshare data.
//!
//! For every submitted job the plugin decides whether the submitting
//! user/bank pairing may run at all, and which numeric priority the job
//! receives. It tracks active jobs per bank against a configured limit and
//! accepts bulk fairshare updates from an external accounting service.
//!
//! ## Lifecycle
//!
//! - **Admission** (`job.validate`): resolve the bank, refuse unknown users,
//!   unknown banks, zero fairshare and exhausted limits, then count the job
//!   and bind the record to it.
//! - **Priority** (`job.state.priority`, `job.priority.get`): hold and
//!   expedite urgencies map to the priority bounds; otherwise the bound
//!   fairshare, scaled by a weight, is nudged by urgency.
//! - **Inactive** (`job.state.inactive`): release the job's slot.
//! - **Bulk update**: create or update records in place, preserving active
//!   job counts.
//!
//! ```rust
//! use std::sync::Arc;
//! use fairshare_priority::core::{AccountingStore, FairsharePlugin, PriorityWeights};
//! use fairshare_priority::infra::InMemoryJob;
//!
//! let store = Arc::new(AccountingStore::new());
//! let plugin = FairsharePlugin::new(Arc::clone(&store), PriorityWeights::default());
//! let payload = r#"{"userid":"42","bank":"b1","default_bank":"b1",
//!     "fairshare":"0.002","max_jobs":"2"}"#;
//! plugin.apply_payload(payload).unwrap();
//!
//! let mut job = InMemoryJob::new(1);
//! plugin.validate(&mut job, 42, None).unwrap();
//! assert_eq!(plugin.priority(&mut job, 42, 16), 200);
//! plugin.inactive(&mut job, 42);
//! assert_eq!(store.get(42, "b1").unwrap().current_jobs, 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Accounting store, admission, priority, and audit.
pub mod core;
/// Configuration models.
pub mod config;
/// Builders to construct the plugin from configuration.
pub mod builders;
/// Host adapters.
pub mod infra;
/// Runtime adapters and host-facing API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
