//! Tests for audit sink

use fairshare_priority::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(7, Some("b1"), AuditAction::Admit, None));
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, 7);
    assert_eq!(events[0].bank.as_deref(), Some("b1"));
    assert_eq!(events[0].action, AuditAction::Admit);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(1, None, AuditAction::Admit, None));
    sink.record(build_audit_event(2, None, AuditAction::Reject, None));
    sink.record(build_audit_event(3, None, AuditAction::Release, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].user_id, 2); // First one popped
    assert_eq!(events[1].user_id, 3);
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(4);
    let mut writer = sink.clone();
    writer.record(build_audit_event(1, None, AuditAction::Update, None));
    assert_eq!(sink.count(AuditAction::Update), 1);
}

#[test]
fn test_zero_capacity_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(1, None, AuditAction::Admit, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event(9, None, AuditAction::Exception, Some("why".to_string()));
    let b = build_audit_event(9, None, AuditAction::Exception, None);

    assert_ne!(a.event_id, b.event_id);
    assert_eq!(a.detail.as_deref(), Some("why"));
    assert_eq!(a.action.to_string(), "exception");
    assert!(a.created_at_ms > 0);
}
