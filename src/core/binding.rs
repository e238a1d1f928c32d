//! Job-scoped binding between an admitted job and its bank record.

use serde::{Deserialize, Serialize};

use crate::core::store::RecordId;
use crate::core::BindingError;

/// Aux key under which the binding is attached to a job.
pub const BINDING_KEY: &str = "fairshare_priority:bank_info";

/// Exception type reported to the host for consistency failures.
pub const EXCEPTION_TYPE: &str = "plugin";

/// Severity passed with consistency exceptions. Anything below 4 is fatal to
/// the job on the host side.
pub const EXCEPTION_SEVERITY: u8 = 3;

/// Association of one admitted job with the record it was counted against.
///
/// Bindings are created only by admission, consumed by completion, and never
/// reassigned. The referenced record is never moved or dropped by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobBinding {
    record: RecordId,
}

impl JobBinding {
    pub(crate) const fn new(record: RecordId) -> Self {
        Self { record }
    }

    /// Record this job was admitted against.
    #[must_use]
    pub const fn record(&self) -> RecordId {
        self.record
    }
}

/// Per-job services the host scheduler offers during a callback.
///
/// One value represents the job currently being processed.
pub trait JobHost {
    /// Fetch the binding stored under `key`, if any.
    fn aux_get(&self, key: &str) -> Option<JobBinding>;

    /// Store `binding` under `key` for the rest of the job's life.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError`] when the host refuses the attachment,
    /// including when a value is already present under `key`.
    fn aux_set(&mut self, key: &str, binding: JobBinding) -> Result<(), BindingError>;

    /// Remove and return the binding stored under `key`.
    ///
    /// Completion consumes the binding this way, so a job releases its slot
    /// at most once.
    fn aux_take(&mut self, key: &str) -> Option<JobBinding>;

    /// Mark the job with an exception. Severity below 4 is fatal.
    fn raise_exception(&mut self, kind: &str, severity: u8, note: &str);
}
