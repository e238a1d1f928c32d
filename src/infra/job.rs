//! In-memory job host.

use std::collections::HashMap;

use crate::core::{BindingError, JobBinding, JobHost};

/// Exception raised against a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobException {
    /// Exception type, e.g. `"plugin"`.
    pub kind: String,
    /// Host severity; below 4 is fatal.
    pub severity: u8,
    /// Human-readable reason.
    pub note: String,
}

impl JobException {
    /// Whether the host would terminate the job for this exception.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.severity < 4
    }
}

/// Job host for development and testing that keeps aux values and raised
/// exceptions in memory.
#[derive(Debug, Default)]
pub struct InMemoryJob {
    id: u64,
    aux: HashMap<String, JobBinding>,
    exceptions: Vec<JobException>,
}

impl InMemoryJob {
    /// Create a job with no aux data.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Job identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Exceptions raised so far, oldest first.
    #[must_use]
    pub fn exceptions(&self) -> &[JobException] {
        &self.exceptions
    }
}

impl JobHost for InMemoryJob {
    fn aux_get(&self, key: &str) -> Option<JobBinding> {
        self.aux.get(key).copied()
    }

    fn aux_set(&mut self, key: &str, binding: JobBinding) -> Result<(), BindingError> {
        if self.aux.contains_key(key) {
            return Err(BindingError::AlreadySet(key.to_owned()));
        }
        self.aux.insert(key.to_owned(), binding);
        Ok(())
    }

    fn aux_take(&mut self, key: &str) -> Option<JobBinding> {
        self.aux.remove(key)
    }

    fn raise_exception(&mut self, kind: &str, severity: u8, note: &str) {
        tracing::debug!(job = self.id, kind, severity, note, "exception raised");
        self.exceptions.push(JobException {
            kind: kind.to_owned(),
            severity,
            note: note.to_owned(),
        });
    }
}
