//! Tests for error types

use fairshare_priority::core::{BindingError, IngestError, PluginError, Rejection};

#[test]
fn test_rejection_reasons_are_distinct() {
    let reasons = [
        Rejection::MalformedArgs,
        Rejection::UserNotFound,
        Rejection::NotInBank,
        Rejection::DefaultBankMissing,
        Rejection::ZeroFairshare,
        Rejection::MaxJobsReached,
        Rejection::BindFailed,
    ]
    .map(|r| r.to_string());

    for (i, a) in reasons.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &reasons[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_rejection_messages() {
    assert_eq!(
        Rejection::UserNotFound.to_string(),
        "user not found in accounting database"
    );
    assert_eq!(
        Rejection::MaxJobsReached.to_string(),
        "user has max number of jobs submitted"
    );
    assert_eq!(Rejection::ZeroFairshare.to_string(), "user fairshare value is 0");
}

#[test]
fn test_ingest_error_messages() {
    let err = IngestError::InvalidNumber {
        field: "max_jobs",
        value: "ten".to_string(),
    };
    assert_eq!(format!("{err}"), "invalid max_jobs: \"ten\"");
    assert_eq!(format!("{}", IngestError::EmptyBatch), "update batch is empty");
    assert_eq!(format!("{}", IngestError::ServiceClosed), "update service closed");
}

#[test]
fn test_binding_and_plugin_errors() {
    let err = BindingError::AlreadySet("k".to_string());
    assert_eq!(format!("{err}"), "job already has a value for `k`");

    let err = PluginError::UnknownTopic("job.state.run".to_string());
    assert_eq!(format!("{err}"), "unknown topic: job.state.run");

    let err = PluginError::Config("bad".to_string());
    assert_eq!(format!("{err}"), "config invalid: bad");
}
