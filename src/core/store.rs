//! In-memory accounting store.
//!
//! Bank records live in an append-only arena. A [`RecordId`] handed out for a
//! `(user, bank)` pair stays valid for the life of the store: updates mutate
//! the record in place and records are never removed, so a job bound at
//! admission always finds the same record at completion.
//!
//! All state sits behind one `parking_lot::RwLock`. Operations that touch
//! `current_jobs` or overwrite limits take the write lock for the whole
//! check-and-mutate sequence.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::Rejection;

/// Numeric user identifier as reported by the host.
pub type UserId = u32;

/// Stable handle to a bank record inside an [`AccountingStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(usize);

impl RecordId {
    /// Position of the record in the store arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Accounting state of one `(user, bank)` pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    /// Earned-vs-consumed ratio; zero means the pairing may not run jobs.
    pub fairshare: f64,
    /// Cap on concurrently active jobs; zero means unlimited.
    pub max_jobs: u32,
    /// Jobs admitted under this record and not yet completed.
    pub current_jobs: u32,
}

impl BankRecord {
    const fn new(fairshare: f64, max_jobs: u32) -> Self {
        Self {
            fairshare,
            max_jobs,
            current_jobs: 0,
        }
    }

    /// Whether the pairing is allowed to run jobs at all. Zero, negative and
    /// NaN fairshare are all ineligible.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.fairshare > 0.0
    }

    /// Whether another job may be admitted without exceeding `max_jobs`.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.max_jobs == 0 || self.current_jobs < self.max_jobs
    }
}

/// A fully parsed update for one `(user, bank)` pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankUpdate {
    /// User the update applies to.
    pub user_id: UserId,
    /// Bank the record belongs to.
    pub bank: String,
    /// Bank used when the user submits without naming one.
    pub default_bank: String,
    /// New fairshare value.
    pub fairshare: f64,
    /// New active job limit.
    pub max_jobs: u32,
}

/// Serializable view of one record, used for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Owning user.
    pub user_id: UserId,
    /// Bank name.
    pub bank: String,
    /// Whether this bank is the user's default.
    pub is_default: bool,
    /// Record contents at snapshot time.
    pub record: BankRecord,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<BankRecord>,
    owners: Vec<(UserId, String)>,
    users: HashMap<UserId, HashMap<String, RecordId>>,
    default_banks: HashMap<UserId, String>,
}

impl StoreState {
    fn lookup(&self, user_id: UserId, bank: &str) -> Option<RecordId> {
        self.users.get(&user_id)?.get(bank).copied()
    }

    fn upsert(&mut self, user_id: UserId, bank: &str, fairshare: f64, max_jobs: u32) -> RecordId {
        if let Some(id) = self.lookup(user_id, bank) {
            let record = &mut self.records[id.0];
            record.fairshare = fairshare;
            record.max_jobs = max_jobs;
            return id;
        }

        let id = RecordId(self.records.len());
        self.records.push(BankRecord::new(fairshare, max_jobs));
        self.owners.push((user_id, bank.to_owned()));
        self.users
            .entry(user_id)
            .or_default()
            .insert(bank.to_owned(), id);
        id
    }

    fn set_default_bank(&mut self, user_id: UserId, bank: &str) {
        self.default_banks.insert(user_id, bank.to_owned());
    }

    fn apply(&mut self, update: &BankUpdate) -> RecordId {
        let id = self.upsert(update.user_id, &update.bank, update.fairshare, update.max_jobs);
        self.set_default_bank(update.user_id, &update.default_bank);
        id
    }
}

/// Process-wide accounting state shared by the admission, priority, cleanup
/// and bulk update paths.
#[derive(Debug, Default)]
pub struct AccountingStore {
    state: RwLock<StoreState>,
}

impl AccountingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the record for `(user_id, bank)`, if registered.
    #[must_use]
    pub fn get(&self, user_id: UserId, bank: &str) -> Option<BankRecord> {
        let state = self.state.read();
        state.lookup(user_id, bank).map(|id| state.records[id.0])
    }

    /// Stable id of the record for `(user_id, bank)`, if registered.
    #[must_use]
    pub fn record_id(&self, user_id: UserId, bank: &str) -> Option<RecordId> {
        self.state.read().lookup(user_id, bank)
    }

    /// Copy of the record behind `id`.
    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<BankRecord> {
        self.state.read().records.get(id.0).copied()
    }

    /// User and bank name that `id` was registered for.
    #[must_use]
    pub fn owner(&self, id: RecordId) -> Option<(UserId, String)> {
        self.state.read().owners.get(id.0).cloned()
    }

    /// The user's default bank name, if one has been set.
    #[must_use]
    pub fn get_default_bank(&self, user_id: UserId) -> Option<String> {
        self.state.read().default_banks.get(&user_id).cloned()
    }

    /// Whether the user has at least one bank registered.
    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.state.read().users.contains_key(&user_id)
    }

    /// Number of distinct users with registered banks.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    /// Create the record, or overwrite `fairshare` and `max_jobs` in place
    /// while preserving `current_jobs`.
    pub fn upsert(&self, user_id: UserId, bank: &str, fairshare: f64, max_jobs: u32) -> RecordId {
        self.state.write().upsert(user_id, bank, fairshare, max_jobs)
    }

    /// Set the bank used when the user submits without naming one.
    pub fn set_default_bank(&self, user_id: UserId, bank: &str) {
        self.state.write().set_default_bank(user_id, bank);
    }

    /// Apply a set of parsed updates under a single write lock.
    pub fn apply_updates(&self, updates: &[BankUpdate]) -> Vec<RecordId> {
        let mut state = self.state.write();
        updates.iter().map(|u| state.apply(u)).collect()
    }

    /// Resolve the bank for a submission, check eligibility and capacity, and
    /// count the job against the record.
    ///
    /// The whole sequence runs under the write lock, so two concurrent
    /// admissions can never both take the last slot.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] describing the first failed check. Nothing is
    /// mutated on rejection.
    pub fn reserve(&self, user_id: UserId, bank: Option<&str>) -> Result<RecordId, Rejection> {
        let mut state = self.state.write();

        let banks = state.users.get(&user_id).ok_or(Rejection::UserNotFound)?;
        let id = match bank {
            Some(name) => banks.get(name).copied().ok_or(Rejection::NotInBank)?,
            None => state
                .default_banks
                .get(&user_id)
                .and_then(|name| banks.get(name))
                .copied()
                .ok_or(Rejection::DefaultBankMissing)?,
        };

        let record = &mut state.records[id.0];
        if !record.is_eligible() {
            return Err(Rejection::ZeroFairshare);
        }
        if !record.has_capacity() {
            return Err(Rejection::MaxJobsReached);
        }
        record.current_jobs += 1;
        Ok(id)
    }

    /// Give back one active job slot on the record behind `id`.
    ///
    /// Returns the record after the release, or `None` when `id` does not
    /// belong to this store. A release against a record already at zero
    /// leaves it at zero.
    pub fn release(&self, id: RecordId) -> Option<BankRecord> {
        let mut state = self.state.write();
        let record = state.records.get_mut(id.0)?;
        if record.current_jobs == 0 {
            tracing::error!("release on record {} with no active jobs", id.0);
        } else {
            record.current_jobs -= 1;
        }
        Some(*record)
    }

    /// Serializable view of every record, ordered by user then bank.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RecordSnapshot> {
        let state = self.state.read();
        let mut out: Vec<RecordSnapshot> = state
            .owners
            .iter()
            .zip(&state.records)
            .map(|((user_id, bank), record)| RecordSnapshot {
                user_id: *user_id,
                bank: bank.clone(),
                is_default: state.default_banks.get(user_id) == Some(bank),
                record: *record,
            })
            .collect();
        out.sort_by(|a, b| (a.user_id, &a.bank).cmp(&(b.user_id, &b.bank)));
        out
    }
}
