//! Job lifecycle entry points: admission, priority, and completion.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::binding::{
    JobBinding, JobHost, BINDING_KEY, EXCEPTION_SEVERITY, EXCEPTION_TYPE,
};
use crate::core::ingest::parse_update;
use crate::core::priority::{calculate_priority, sentinel_priority, PriorityWeights};
use crate::core::store::{AccountingStore, BankUpdate, RecordId, UserId};
use crate::core::{build_audit_event, AuditAction, AuditSink, IngestError, Rejection};

/// Note attached to a job that reaches priority calculation unbound.
pub const MISSING_BINDING_HOLD: &str = "bank info is missing; holding job";
/// Note attached to a job that reaches completion unbound.
pub const MISSING_BINDING: &str = "bank info is missing";

/// Fairshare admission and priority plugin.
///
/// Holds a handle to the shared [`AccountingStore`]; the host calls
/// [`validate`](Self::validate), [`priority`](Self::priority) and
/// [`inactive`](Self::inactive) over each job's life while the accounting
/// service feeds [`apply_payload`](Self::apply_payload) concurrently.
pub struct FairsharePlugin {
    store: Arc<AccountingStore>,
    weights: PriorityWeights,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl FairsharePlugin {
    /// Create a plugin over `store`.
    #[must_use]
    pub const fn new(store: Arc<AccountingStore>, weights: PriorityWeights) -> Self {
        Self {
            store,
            weights,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Shared accounting store.
    #[must_use]
    pub const fn store(&self) -> &Arc<AccountingStore> {
        &self.store
    }

    /// Weights used for priority calculation.
    #[must_use]
    pub const fn weights(&self) -> PriorityWeights {
        self.weights
    }

    /// Admit a submitted job.
    ///
    /// On success the job counts against the resolved bank record and carries
    /// a [`JobBinding`] to it under [`BINDING_KEY`].
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] to report to the submitter. A rejected job
    /// carries no binding and the store is unchanged.
    pub fn validate<H>(
        &self,
        job: &mut H,
        user_id: UserId,
        bank: Option<&str>,
    ) -> Result<JobBinding, Rejection>
    where
        H: JobHost + ?Sized,
    {
        let record = match self.store.reserve(user_id, bank) {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(user_id, bank, %reason, "job rejected");
                self.record_audit(user_id, bank, AuditAction::Reject, Some(reason.to_string()));
                return Err(reason);
            }
        };

        let binding = JobBinding::new(record);
        if let Err(e) = job.aux_set(BINDING_KEY, binding) {
            tracing::error!(user_id, error = %e, "failed to attach bank info, releasing slot");
            self.store.release(record);
            let reason = Rejection::BindFailed;
            self.record_audit(user_id, bank, AuditAction::Reject, Some(reason.to_string()));
            return Err(reason);
        }

        let bank_name = self.bank_name(record);
        tracing::info!(user_id, bank = bank_name.as_deref(), "job admitted");
        self.record_audit(user_id, bank_name.as_deref(), AuditAction::Admit, None);
        Ok(binding)
    }

    /// Compute the job's priority. Never mutates the store.
    ///
    /// Reserved urgencies short-circuit before the binding is consulted. A job
    /// without a binding is marked with a fatal exception and gets priority 0.
    pub fn priority<H>(&self, job: &mut H, user_id: UserId, urgency: i32) -> u64
    where
        H: JobHost + ?Sized,
    {
        if let Some(priority) = sentinel_priority(urgency) {
            return priority;
        }

        let Some(fairshare) = job
            .aux_get(BINDING_KEY)
            .and_then(|b| self.store.record(b.record()))
            .map(|r| r.fairshare)
        else {
            self.raise(job, user_id, MISSING_BINDING_HOLD);
            return 0;
        };

        let priority = calculate_priority(self.weights, fairshare, urgency);
        tracing::debug!(user_id, urgency, fairshare, priority, "priority computed");
        priority
    }

    /// Release the job's active slot when it leaves the active state.
    ///
    /// The binding is consumed, so the slot is released once per admission.
    /// A job without a binding, including one already released, is marked
    /// with a fatal exception and nothing is released.
    pub fn inactive<H>(&self, job: &mut H, user_id: UserId)
    where
        H: JobHost + ?Sized,
    {
        let Some(binding) = job.aux_take(BINDING_KEY) else {
            self.raise(job, user_id, MISSING_BINDING);
            return;
        };

        match self.store.release(binding.record()) {
            Some(record) => {
                let bank_name = self.bank_name(binding.record());
                tracing::info!(
                    user_id,
                    bank = bank_name.as_deref(),
                    current_jobs = record.current_jobs,
                    "job slot released"
                );
                self.record_audit(user_id, bank_name.as_deref(), AuditAction::Release, None);
            }
            None => self.raise(job, user_id, MISSING_BINDING),
        }
    }

    /// Apply already validated updates under a single store lock.
    pub fn apply_updates(&self, updates: &[BankUpdate]) -> Vec<RecordId> {
        let ids = self.store.apply_updates(updates);
        for update in updates {
            tracing::info!(
                user_id = update.user_id,
                bank = %update.bank,
                fairshare = update.fairshare,
                max_jobs = update.max_jobs,
                "bank record updated"
            );
            self.record_audit(
                update.user_id,
                Some(&update.bank),
                AuditAction::Update,
                Some(format!(
                    "fairshare={} max_jobs={} default_bank={}",
                    update.fairshare, update.max_jobs, update.default_bank
                )),
            );
        }
        ids
    }

    /// Decode a raw bulk update payload and apply it.
    ///
    /// The payload is fully decoded before the store is locked. Returns the
    /// number of entries applied.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] when the payload is malformed; nothing is
    /// applied in that case.
    pub fn apply_payload(&self, payload: &str) -> Result<usize, IngestError> {
        let updates = parse_update(payload).inspect_err(|e| {
            tracing::error!(error = %e, "rejected bulk update");
        })?;
        self.apply_updates(&updates);
        Ok(updates.len())
    }

    fn bank_name(&self, record: RecordId) -> Option<String> {
        self.store.owner(record).map(|(_, bank)| bank)
    }

    fn raise<H>(&self, job: &mut H, user_id: UserId, note: &str)
    where
        H: JobHost + ?Sized,
    {
        tracing::error!(user_id, note, "job lifecycle inconsistency");
        job.raise_exception(EXCEPTION_TYPE, EXCEPTION_SEVERITY, note);
        self.record_audit(user_id, None, AuditAction::Exception, Some(note.to_owned()));
    }

    fn record_audit(
        &self,
        user_id: UserId,
        bank: Option<&str>,
        action: AuditAction,
        detail: Option<String>,
    ) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(user_id, bank, action, detail));
        }
    }
}
