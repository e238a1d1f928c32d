//! Tests for the in-memory job host

use std::sync::Arc;

use fairshare_priority::core::{
    AccountingStore, BindingError, FairsharePlugin, JobHost, PriorityWeights, BINDING_KEY,
};
use fairshare_priority::infra::InMemoryJob;

fn bound_job() -> (FairsharePlugin, InMemoryJob) {
    let store = Arc::new(AccountingStore::new());
    store.upsert(1, "a", 1.0, 0);
    store.set_default_bank(1, "a");
    let plugin = FairsharePlugin::new(store, PriorityWeights::default());
    let mut job = InMemoryJob::new(77);
    plugin.validate(&mut job, 1, None).unwrap();
    (plugin, job)
}

#[test]
fn test_aux_set_once() {
    let (_plugin, mut job) = bound_job();
    let binding = job.aux_get(BINDING_KEY).unwrap();
    assert_eq!(
        job.aux_set(BINDING_KEY, binding),
        Err(BindingError::AlreadySet(BINDING_KEY.to_string()))
    );
    assert_eq!(job.id(), 77);
}

#[test]
fn test_unknown_key_is_absent() {
    let (_plugin, job) = bound_job();
    assert!(job.aux_get("other:key").is_none());
}

#[test]
fn test_exceptions_recorded_in_order() {
    let mut job = InMemoryJob::new(1);
    job.raise_exception("plugin", 3, "first");
    job.raise_exception("plugin", 5, "second");

    let notes: Vec<_> = job.exceptions().iter().map(|e| e.note.as_str()).collect();
    assert_eq!(notes, vec!["first", "second"]);
    assert!(job.exceptions()[0].is_fatal());
    assert!(!job.exceptions()[1].is_fatal());
}

#[test]
fn test_aux_take_consumes_entry() {
    let (_plugin, mut job) = bound_job();
    let binding = job.aux_take(BINDING_KEY);
    assert!(binding.is_some());
    assert!(job.aux_get(BINDING_KEY).is_none());
    assert!(job.aux_take(BINDING_KEY).is_none());
}
