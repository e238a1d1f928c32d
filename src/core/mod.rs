//! Accounting store, admission, and priority logic.

pub mod audit;
pub mod binding;
pub mod error;
pub mod ingest;
pub mod plugin;
pub mod priority;
pub mod store;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use binding::{JobBinding, JobHost, BINDING_KEY};
pub use error::{AppResult, BindingError, IngestError, PluginError, Rejection};
pub use ingest::{parse_update, parse_update_value, RecUpdateEntry, Scalar};
pub use plugin::FairsharePlugin;
pub use priority::{
    calculate_priority, PriorityWeights, PRIORITY_MAX, PRIORITY_MIN, URGENCY_DEFAULT,
    URGENCY_EXPEDITE, URGENCY_HOLD,
};
pub use store::{AccountingStore, BankRecord, BankUpdate, RecordId, RecordSnapshot, UserId};
