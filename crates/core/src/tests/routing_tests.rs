// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    MemoryStore, OTHER_ORG, ORG, create_test_context, seed_subscription,
};
use crate::{
    AssignOutcome, AssignScope, AssignmentResult, CoreError, EngineConfig, JobAssignment,
    ResolvedRoute, assign_future_jobs, assign_job, assign_job_to_route, assign_subscription_jobs,
    find_or_create_route, materialize, route_display_name,
};
use fieldsched_audit::AuditSubject;
use fieldsched_domain::{DomainError, Frequency, Job, JobStatus, RouteStatus, Subscription};
use time::macros::date;
use time::Weekday;

fn two_subscriptions_on_tuesday() -> (MemoryStore, Job, Job) {
    let mut store: MemoryStore = MemoryStore::new();
    let config: EngineConfig = EngineConfig::default();
    let first: Subscription = seed_subscription(
        &mut store,
        Frequency::Weekly,
        Some(Weekday::Tuesday),
        date!(2024 - 03 - 01),
    );
    let second: Subscription = seed_subscription(
        &mut store,
        Frequency::Weekly,
        Some(Weekday::Tuesday),
        date!(2024 - 03 - 01),
    );
    materialize(&mut store, &config, &first, date!(2024 - 03 - 04), "test").unwrap();
    materialize(&mut store, &config, &second, date!(2024 - 03 - 04), "test").unwrap();

    let job_a: Job = store.live_jobs(first.subscription_id)[0].clone();
    let job_b: Job = store.live_jobs(second.subscription_id)[0].clone();
    assert_eq!(job_a.scheduled_date, date!(2024 - 03 - 05));
    assert_eq!(job_b.scheduled_date, date!(2024 - 03 - 05));
    (store, job_a, job_b)
}

#[test]
fn test_find_or_create_route_creates_planned_route_once() {
    let mut store: MemoryStore = MemoryStore::new();

    let first: ResolvedRoute = find_or_create_route(&mut store, ORG, 7, date!(2024 - 03 - 05)).unwrap();
    let second: ResolvedRoute =
        find_or_create_route(&mut store, ORG, 7, date!(2024 - 03 - 05)).unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.route.route_id, second.route.route_id);
    assert_eq!(first.route.status, RouteStatus::Planned);
    assert_eq!(store.routes.len(), 1);
}

#[test]
fn test_same_technician_id_gets_separate_routes_per_organization() {
    let mut store: MemoryStore = MemoryStore::new();

    let ours: ResolvedRoute = find_or_create_route(&mut store, ORG, 7, date!(2024 - 03 - 05)).unwrap();
    let theirs: ResolvedRoute =
        find_or_create_route(&mut store, OTHER_ORG, 7, date!(2024 - 03 - 05)).unwrap();

    assert!(ours.created);
    assert!(theirs.created);
    assert_ne!(ours.route.route_id, theirs.route.route_id);
    assert_eq!(theirs.route.organization_id, OTHER_ORG);

    let again: ResolvedRoute = find_or_create_route(&mut store, ORG, 7, date!(2024 - 03 - 05)).unwrap();
    assert_eq!(again.route.route_id, ours.route.route_id);
}

#[test]
fn test_route_name_is_for_display() {
    assert_eq!(
        route_display_name(7, date!(2024 - 03 - 05)),
        "Route for technician 7 on Tuesday, 2024-03-05"
    );
}

#[test]
fn test_same_technician_same_date_shares_route() {
    let (mut store, job_a, job_b) = two_subscriptions_on_tuesday();

    let a: JobAssignment =
        assign_job_to_route(&mut store, ORG, job_a.job_id, 7, job_a.scheduled_date).unwrap();
    let b: JobAssignment =
        assign_job_to_route(&mut store, ORG, job_b.job_id, 7, job_b.scheduled_date).unwrap();

    assert_eq!(a.route_id, b.route_id);
    assert_eq!(a.route_order, 1);
    assert_eq!(b.route_order, 2);
    assert_eq!(store.job(job_b.job_id).assigned_to, Some(7));
}

#[test]
fn test_other_technician_gets_other_route() {
    let (mut store, job_a, job_b) = two_subscriptions_on_tuesday();

    let a: JobAssignment =
        assign_job_to_route(&mut store, ORG, job_a.job_id, 7, job_a.scheduled_date).unwrap();
    let b: JobAssignment =
        assign_job_to_route(&mut store, ORG, job_b.job_id, 8, job_b.scheduled_date).unwrap();

    assert_ne!(a.route_id, b.route_id);
    assert_eq!(store.routes.len(), 2);
}

#[test]
fn test_reassigning_to_same_route_changes_nothing() {
    let (mut store, job_a, _) = two_subscriptions_on_tuesday();

    assign_job_to_route(&mut store, ORG, job_a.job_id, 7, job_a.scheduled_date).unwrap();
    let again: JobAssignment =
        assign_job_to_route(&mut store, ORG, job_a.job_id, 7, job_a.scheduled_date).unwrap();

    assert!(!again.changed);
    assert_eq!(again.route_order, 1);
}

#[test]
fn test_concurrent_route_creation_reuses_winner() {
    let mut store: MemoryStore = MemoryStore::new();
    store.race_next_route_insert = true;

    let resolved: ResolvedRoute =
        find_or_create_route(&mut store, ORG, 7, date!(2024 - 03 - 05)).unwrap();

    assert!(!resolved.created);
    assert_eq!(store.routes.len(), 1);
    assert_eq!(resolved.route.route_id, store.routes[0].route_id);
}

#[test]
fn test_started_job_cannot_be_assigned() {
    let (mut store, job_a, _) = two_subscriptions_on_tuesday();
    store.set_job_status(job_a.job_id, JobStatus::InProgress);

    let result = assign_job_to_route(&mut store, ORG, job_a.job_id, 7, job_a.scheduled_date);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::JobNotAssignable {
            job_id: job_a.job_id,
            status: JobStatus::InProgress,
        }))
    );
}

#[test]
fn test_route_date_must_match_job_date() {
    let (mut store, job_a, _) = two_subscriptions_on_tuesday();

    let result = assign_job_to_route(&mut store, ORG, job_a.job_id, 7, date!(2024 - 03 - 06));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::RouteDateMismatch { .. }))
    ));
    assert!(store.routes.is_empty());
}

#[test]
fn test_job_in_other_organization_is_not_found() {
    let (mut store, job_a, _) = two_subscriptions_on_tuesday();

    let result = assign_job_to_route(&mut store, OTHER_ORG, job_a.job_id, 7, job_a.scheduled_date);

    assert_eq!(
        result,
        Err(CoreError::NotFound {
            entity: "job",
            id: job_a.job_id
        })
    );
}

#[test]
fn test_assign_future_jobs_binds_each_date_to_its_route() {
    let mut store: MemoryStore = MemoryStore::new();
    let subscription: Subscription =
        seed_subscription(&mut store, Frequency::Weekly, None, date!(2024 - 03 - 01));
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();

    let outcome: AssignOutcome = assign_future_jobs(
        &mut store,
        &subscription,
        7,
        date!(2024 - 03 - 04),
        AssignScope::UnassignedOnly,
    )
    .unwrap();

    assert_eq!(outcome.count(), 12);
    assert_eq!(outcome.routes.len(), 12);
    assert_eq!(outcome.routes_created, 12);
    assert!(
        store
            .live_jobs(subscription.subscription_id)
            .iter()
            .all(|job| job.assigned_to == Some(7) && job.route_id.is_some())
    );
}

#[test]
fn test_unassigned_scope_leaves_routed_jobs_alone() {
    let mut store: MemoryStore = MemoryStore::new();
    let subscription: Subscription =
        seed_subscription(&mut store, Frequency::Weekly, None, date!(2024 - 03 - 01));
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();
    let first: Job = store.live_jobs(subscription.subscription_id)[0].clone();
    assign_job_to_route(&mut store, ORG, first.job_id, 8, first.scheduled_date).unwrap();

    let unassigned_only: AssignOutcome = assign_future_jobs(
        &mut store,
        &subscription,
        7,
        date!(2024 - 03 - 04),
        AssignScope::UnassignedOnly,
    )
    .unwrap();
    assert_eq!(unassigned_only.count(), 11);
    assert_eq!(store.job(first.job_id).assigned_to, Some(8));

    let all_live: AssignOutcome = assign_future_jobs(
        &mut store,
        &subscription,
        7,
        date!(2024 - 03 - 04),
        AssignScope::AllLive,
    )
    .unwrap();
    assert_eq!(all_live.count(), 1);
    assert_eq!(store.job(first.job_id).assigned_to, Some(7));
}

#[test]
fn test_assign_job_records_audit_event() {
    let (mut store, job_a, _) = two_subscriptions_on_tuesday();
    let ctx = create_test_context(date!(2024 - 03 - 04));

    let result: AssignmentResult<JobAssignment> =
        assign_job(&mut store, &ctx, job_a.job_id, 7, job_a.scheduled_date).unwrap();

    assert!(result.audit_event_id.is_some());
    let events = store.events_for(&AuditSubject::job(job_a.job_id));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action.name, "AssignJob");
    assert!(events[0].after.data.contains("assigned_to=7"));

    let repeat: AssignmentResult<JobAssignment> =
        assign_job(&mut store, &ctx, job_a.job_id, 7, job_a.scheduled_date).unwrap();
    assert_eq!(repeat.audit_event_id, None);
}

#[test]
fn test_assign_subscription_jobs_audits_bulk_assignment() {
    let mut store: MemoryStore = MemoryStore::new();
    let subscription: Subscription = seed_subscription(
        &mut store,
        Frequency::Weekly,
        Some(Weekday::Monday),
        date!(2024 - 03 - 01),
    );
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();
    let ctx = create_test_context(date!(2024 - 03 - 04));

    let result: AssignmentResult<AssignOutcome> =
        assign_subscription_jobs(&mut store, &ctx, subscription.subscription_id, 9).unwrap();

    assert_eq!(result.outcome.count(), 2);
    let events = store.events_for(&AuditSubject::subscription(subscription.subscription_id));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action.name, "AssignSubscriptionJobs");
}

#[test]
fn test_attach_failure_reports_completed_assignments() {
    let mut store: MemoryStore = MemoryStore::new();
    let subscription: Subscription =
        seed_subscription(&mut store, Frequency::Weekly, None, date!(2024 - 03 - 01));
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();
    store.fail_attach = true;

    let result = assign_future_jobs(
        &mut store,
        &subscription,
        7,
        date!(2024 - 03 - 04),
        AssignScope::UnassignedOnly,
    );

    assert!(matches!(
        result,
        Err(CoreError::Storage { completed: 0, .. })
    ));
}
