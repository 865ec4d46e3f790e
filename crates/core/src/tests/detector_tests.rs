// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryStore, ORG, OTHER_ORG, create_test_subscription};
use crate::{
    AssignScope, AttentionItem, AttentionReason, EngineConfig, JobStore, assign_future_jobs,
    detect_unassigned_work, materialize, void_future_jobs,
};
use fieldsched_domain::{
    Client, Frequency, Location, NewSubscription, Subscription, SubscriptionStatus,
};
use time::macros::date;
use time::Weekday;

fn add_subscription(
    store: &mut MemoryStore,
    client: &Client,
    location: &Location,
    status: SubscriptionStatus,
) -> Subscription {
    let mut new_subscription: NewSubscription = create_test_subscription(
        client,
        location,
        Frequency::Weekly,
        Some(Weekday::Tuesday),
        date!(2024 - 03 - 01),
    );
    new_subscription.status = status;
    store.insert_subscription(&new_subscription).unwrap()
}

#[test]
fn test_fresh_active_subscription_has_no_jobs() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let subscription: Subscription =
        add_subscription(&mut store, &client, &location, SubscriptionStatus::Active);

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert_eq!(
        items,
        vec![AttentionItem {
            client_id: client.client_id,
            location_id: location.location_id,
            subscription_id: Some(subscription.subscription_id),
            reasons: vec![AttentionReason::NoJobs],
        }]
    );
}

#[test]
fn test_unrouted_future_jobs_are_flagged_until_routed() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let subscription: Subscription =
        add_subscription(&mut store, &client, &location, SubscriptionStatus::Active);
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();
    assert_eq!(
        items[0].reasons,
        vec![AttentionReason::UnroutedJobs {
            count: 2,
            earliest: date!(2024 - 03 - 05),
        }]
    );

    assign_future_jobs(
        &mut store,
        &subscription,
        7,
        date!(2024 - 03 - 04),
        AssignScope::UnassignedOnly,
    )
    .unwrap();
    assert!(
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_past_unrouted_jobs_are_ignored() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let subscription: Subscription =
        add_subscription(&mut store, &client, &location, SubscriptionStatus::Active);
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 20)).unwrap();

    assert!(items.is_empty());
}

#[test]
fn test_fully_voided_active_subscription_is_flagged() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let subscription: Subscription =
        add_subscription(&mut store, &client, &location, SubscriptionStatus::Active);
    materialize(
        &mut store,
        &EngineConfig::default(),
        &subscription,
        date!(2024 - 03 - 04),
        "test",
    )
    .unwrap();
    void_future_jobs(
        &mut store,
        subscription.subscription_id,
        date!(2024 - 03 - 04),
        "schedule changed",
    )
    .unwrap();

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert_eq!(items[0].reasons, vec![AttentionReason::NoJobs]);
}

#[test]
fn test_pending_cleanup_is_flagged_alongside_other_reasons() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let mut new_subscription: NewSubscription = create_test_subscription(
        &client,
        &location,
        Frequency::Monthly,
        None,
        date!(2024 - 03 - 01),
    );
    new_subscription.initial_cleanup_required = true;
    store.insert_subscription(&new_subscription).unwrap();

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert_eq!(
        items[0].reasons,
        vec![AttentionReason::InitialCleanupPending, AttentionReason::NoJobs]
    );
}

#[test]
fn test_location_of_active_client_without_subscription_awaits_onboarding() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    let inactive: Client = store.add_client(ORG, "Gone", false);
    store.add_location(&inactive, "Old house");

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert_eq!(
        items,
        vec![AttentionItem {
            client_id: client.client_id,
            location_id: location.location_id,
            subscription_id: None,
            reasons: vec![AttentionReason::AwaitingOnboarding],
        }]
    );
}

#[test]
fn test_location_with_only_canceled_subscription_awaits_onboarding() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(ORG, "Pat", true);
    let location: Location = store.add_location(&client, "Front");
    add_subscription(&mut store, &client, &location, SubscriptionStatus::Canceled);

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subscription_id, None);
    assert_eq!(items[0].reasons, vec![AttentionReason::AwaitingOnboarding]);
}

#[test]
fn test_other_organizations_are_not_scanned() {
    let mut store: MemoryStore = MemoryStore::new();
    let client: Client = store.add_client(OTHER_ORG, "Elsewhere", true);
    store.add_location(&client, "Front");

    let items: Vec<AttentionItem> =
        detect_unassigned_work(&mut store, ORG, date!(2024 - 03 - 04)).unwrap();

    assert!(items.is_empty());
}

#[test]
fn test_reason_codes_are_stable() {
    assert_eq!(AttentionReason::NoJobs.code(), "no_jobs");
    assert_eq!(
        AttentionReason::UnroutedJobs {
            count: 3,
            earliest: date!(2024 - 03 - 05)
        }
        .to_string(),
        "3 scheduled jobs without a route (earliest 2024-03-05)"
    );
}
