//! Tests for the JSON callback handlers used by the host scheduler.

use std::sync::Arc;

use serde_json::json;

use fairshare_priority::core::{
    AccountingStore, FairsharePlugin, PluginError, PriorityWeights, Rejection,
};
use fairshare_priority::infra::InMemoryJob;
use fairshare_priority::runtime::api::store_snapshot;
use fairshare_priority::runtime::{
    dispatch, handle_priority, handle_rec_update, handle_validate, CallbackOutcome,
    PriorityResponse,
};

fn plugin() -> FairsharePlugin {
    let plugin = FairsharePlugin::new(Arc::new(AccountingStore::new()), PriorityWeights::default());
    handle_rec_update(
        &plugin,
        r#"{"data":[
            {"userid":"42","bank":"b1","default_bank":"b1","fairshare":"0.002","max_jobs":"1"},
            {"userid":"42","bank":"b2","default_bank":"b1","fairshare":"0.004","max_jobs":"0"}
        ]}"#,
    )
    .unwrap();
    plugin
}

fn validate_args(user: u32, bank: Option<&str>) -> serde_json::Value {
    let system = bank.map_or_else(|| json!({}), |b| json!({ "bank": b }));
    json!({
        "userid": user,
        "urgency": 16,
        "jobspec": {"attributes": {"system": system}}
    })
}

#[test]
fn test_full_job_through_dispatch() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);

    let args = validate_args(42, Some("b2"));
    let outcome = dispatch(&plugin, "job.validate", &mut job, &args).unwrap();
    assert_eq!(outcome, CallbackOutcome::Accepted);

    let args = json!({"userid": 42, "urgency": 16});
    let outcome = dispatch(&plugin, "job.state.priority", &mut job, &args).unwrap();
    assert_eq!(outcome, CallbackOutcome::Priority(PriorityResponse { priority: 400 }));

    let args = json!({"userid": 42, "urgency": 20});
    let outcome = dispatch(&plugin, "job.priority.get", &mut job, &args).unwrap();
    assert_eq!(outcome, CallbackOutcome::Priority(PriorityResponse { priority: 404 }));

    let args = json!({"userid": 42});
    let outcome = dispatch(&plugin, "job.state.inactive", &mut job, &args).unwrap();
    assert_eq!(outcome, CallbackOutcome::Released);
    assert_eq!(plugin.store().get(42, "b2").unwrap().current_jobs, 0);

    // A duplicate completion notification has nothing left to release.
    let outcome = dispatch(&plugin, "job.state.inactive", &mut job, &args).unwrap();
    assert_eq!(outcome, CallbackOutcome::Released);
    assert_eq!(plugin.store().get(42, "b2").unwrap().current_jobs, 0);
    assert_eq!(job.exceptions().len(), 1);
}

#[test]
fn test_validate_uses_default_bank_when_unset() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    handle_validate(&plugin, &mut job, &validate_args(42, None)).unwrap();
    assert_eq!(plugin.store().get(42, "b1").unwrap().current_jobs, 1);
    assert_eq!(plugin.store().get(42, "b2").unwrap().current_jobs, 0);
}

#[test]
fn test_validate_rejections_surface_reason() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);

    let outcome = dispatch(&plugin, "job.validate", &mut job, &validate_args(7, None)).unwrap();
    assert_eq!(outcome, CallbackOutcome::Rejected(Rejection::UserNotFound));

    let outcome =
        dispatch(&plugin, "job.validate", &mut job, &validate_args(42, Some("nope"))).unwrap();
    assert_eq!(outcome, CallbackOutcome::Rejected(Rejection::NotInBank));
}

#[test]
fn test_undecodable_validate_args_rejected() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    let result = handle_validate(&plugin, &mut job, &json!({"userid": 42}));
    assert_eq!(result, Err(Rejection::MalformedArgs));
    assert_eq!(plugin.store().get(42, "b1").unwrap().current_jobs, 0);
}

#[test]
fn test_priority_args_must_decode() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    let result = handle_priority(&plugin, &mut job, &json!({"userid": "x"}));
    assert!(matches!(result, Err(PluginError::Unpack(_))));
}

#[test]
fn test_unbound_priority_holds_job() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    let args = json!({"userid": 42, "urgency": 16});
    let response = handle_priority(&plugin, &mut job, &args).unwrap();
    assert_eq!(response.priority, 0);
    assert_eq!(job.exceptions().len(), 1);
    assert_eq!(job.exceptions()[0].kind, "plugin");
}

#[test]
fn test_unknown_topic() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    let result = dispatch(&plugin, "job.state.run", &mut job, &json!({}));
    assert!(matches!(result, Err(PluginError::UnknownTopic(_))));
}

#[test]
fn test_snapshot_reports_counts() {
    let plugin = plugin();
    let mut job = InMemoryJob::new(1);
    handle_validate(&plugin, &mut job, &validate_args(42, None)).unwrap();

    let snapshot = store_snapshot(&plugin);
    assert_eq!(snapshot.records.len(), 2);
    let b1 = &snapshot.records[0];
    assert_eq!(b1.bank, "b1");
    assert!(b1.is_default);
    assert_eq!(b1.record.current_jobs, 1);

    let encoded = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(encoded["records"][1]["bank"], "b2");
}
