// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{ORG, create_test_persistence, create_test_subscription, seed_client};
use crate::Persistence;
use fieldsched::{JobStore, StoreError};
use fieldsched_domain::{Client, Frequency, Subscription, SubscriptionStatus};
use time::Weekday;
use time::macros::date;

#[test]
fn test_subscription_round_trips_every_column() {
    let mut persistence: Persistence = create_test_persistence();
    let (client, location) = seed_client(&mut persistence);
    let mut new_subscription = create_test_subscription(
        &client,
        &location,
        Frequency::Biweekly,
        Some(Weekday::Wednesday),
        date!(2024 - 03 - 01),
    );
    new_subscription.initial_cleanup_required = true;
    new_subscription.assigned_technician_id = Some(7);

    let stored: Subscription = persistence.insert_subscription(&new_subscription).unwrap();
    let loaded: Subscription = persistence
        .get_subscription(stored.subscription_id)
        .unwrap();

    assert_eq!(stored, loaded);
    assert_eq!(loaded.frequency, Frequency::Biweekly);
    assert_eq!(loaded.preferred_day, Some(Weekday::Wednesday));
    assert_eq!(loaded.anchor_date, date!(2024 - 03 - 01));
    assert!(loaded.cleanup_outstanding());
    assert_eq!(loaded.assigned_technician_id, Some(7));
}

#[test]
fn test_update_overwrites_mutable_columns() {
    let mut persistence: Persistence = create_test_persistence();
    let (client, location) = seed_client(&mut persistence);
    let mut subscription: Subscription = persistence
        .insert_subscription(&create_test_subscription(
            &client,
            &location,
            Frequency::Weekly,
            None,
            date!(2024 - 03 - 01),
        ))
        .unwrap();

    subscription.status = SubscriptionStatus::PastDue;
    subscription.preferred_day = Some(Weekday::Friday);
    subscription.price_cents = 6000;
    subscription.initial_cleanup_completed = true;
    persistence.update_subscription(&subscription).unwrap();

    let loaded: Subscription = persistence
        .get_subscription(subscription.subscription_id)
        .unwrap();
    assert_eq!(loaded, subscription);
}

#[test]
fn test_unknown_subscription_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(matches!(
        persistence.get_subscription(404),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_subscriptions_are_listed_per_client_and_organization() {
    let mut persistence: Persistence = create_test_persistence();
    let (client, location) = seed_client(&mut persistence);
    let other: Client = persistence.create_client(ORG + 1, "Elsewhere").unwrap();
    let other_location = persistence
        .create_location(other.client_id, "Back yard")
        .unwrap();

    for _ in 0..2 {
        persistence
            .insert_subscription(&create_test_subscription(
                &client,
                &location,
                Frequency::Monthly,
                None,
                date!(2024 - 01 - 31),
            ))
            .unwrap();
    }
    persistence
        .insert_subscription(&create_test_subscription(
            &other,
            &other_location,
            Frequency::Weekly,
            None,
            date!(2024 - 01 - 31),
        ))
        .unwrap();

    assert_eq!(persistence.list_subscriptions(ORG).unwrap().len(), 2);
    assert_eq!(
        persistence
            .list_subscriptions_for_client(client.client_id)
            .unwrap()
            .len(),
        2
    );
    assert_eq!(persistence.list_subscriptions(ORG + 1).unwrap().len(), 1);
}

#[test]
fn test_client_activation_flag_is_stored() {
    let mut persistence: Persistence = create_test_persistence();
    let (client, _) = seed_client(&mut persistence);
    assert!(client.is_active);

    persistence.set_client_active(client.client_id, false).unwrap();
    assert!(!persistence.get_client(client.client_id).unwrap().is_active);

    assert!(matches!(
        persistence.set_client_active(404, false),
        Err(StoreError::NotFound(_))
    ));
}
