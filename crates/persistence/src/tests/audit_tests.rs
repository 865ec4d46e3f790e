// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{ORG, create_test_actor, create_test_cause, create_test_persistence};
use crate::Persistence;
use fieldsched::JobStore;
use fieldsched_audit::{Action, AuditEvent, AuditSubject, StateSnapshot, SubjectKind};

fn create_test_event(subject: AuditSubject, name: &str) -> AuditEvent {
    AuditEvent::new(
        ORG,
        subject,
        create_test_actor(),
        create_test_cause(),
        Action::new(name.to_string(), Some(String::from("details"))),
        StateSnapshot::absent(),
        StateSnapshot::new(String::from("status=Active")),
    )
}

#[test]
fn test_audit_event_round_trips() {
    let mut persistence: Persistence = create_test_persistence();
    let event: AuditEvent = create_test_event(AuditSubject::subscription(42), "CreateSubscription");

    let event_id: i64 = persistence.record_audit_event(&event).unwrap();
    assert!(event_id > 0);

    let events: Vec<AuditEvent> = persistence
        .list_audit_events(&AuditSubject::subscription(42))
        .unwrap();
    assert_eq!(events, vec![event]);
}

#[test]
fn test_events_are_listed_per_subject_in_insertion_order() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .record_audit_event(&create_test_event(AuditSubject::subscription(1), "First"))
        .unwrap();
    persistence
        .record_audit_event(&create_test_event(AuditSubject::job(1), "JobEvent"))
        .unwrap();
    persistence
        .record_audit_event(&create_test_event(AuditSubject::subscription(2), "Other"))
        .unwrap();
    persistence
        .record_audit_event(&create_test_event(AuditSubject::subscription(1), "Second"))
        .unwrap();

    let names: Vec<String> = persistence
        .list_audit_events(&AuditSubject::subscription(1))
        .unwrap()
        .into_iter()
        .map(|event| event.action.name)
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[test]
fn test_subject_without_id_is_stored_as_null() {
    let mut persistence: Persistence = create_test_persistence();
    let subject: AuditSubject = AuditSubject {
        kind: SubjectKind::Route,
        id: None,
    };
    persistence
        .record_audit_event(&create_test_event(subject, "Rejected"))
        .unwrap();

    assert_eq!(persistence.list_audit_events(&subject).unwrap().len(), 1);
    assert!(
        persistence
            .list_audit_events(&AuditSubject::new(SubjectKind::Route, 1))
            .unwrap()
            .is_empty()
    );
}
