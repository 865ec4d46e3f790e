// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod initialization_tests;
mod route_tests;
mod subscription_tests;

use fieldsched::{JobStore, RequestContext};
use fieldsched_audit::{Actor, Cause};
use fieldsched_domain::{
    Client, Frequency, Location, NewJob, NewSubscription, Subscription, SubscriptionStatus,
};
use time::{Date, Weekday};

use crate::Persistence;

pub const ORG: i64 = 1;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_actor() -> Actor {
    Actor::staff("dispatcher-1")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-100"), String::from("Staff request"))
}

pub fn create_test_context(today: Date) -> RequestContext {
    RequestContext::new(ORG, today, create_test_actor(), create_test_cause())
}

/// Creates a client with one location in `ORG`.
pub fn seed_client(persistence: &mut Persistence) -> (Client, Location) {
    let client: Client = persistence.create_client(ORG, "Pat's Lawn").unwrap();
    let location: Location = persistence
        .create_location(client.client_id, "Front yard")
        .unwrap();
    (client, location)
}

pub fn create_test_subscription(
    client: &Client,
    location: &Location,
    frequency: Frequency,
    preferred_day: Option<Weekday>,
    anchor_date: Date,
) -> NewSubscription {
    NewSubscription {
        organization_id: client.organization_id,
        client_id: client.client_id,
        location_id: location.location_id,
        frequency,
        preferred_day,
        status: SubscriptionStatus::Active,
        price_cents: 4500,
        anchor_date,
        initial_cleanup_required: false,
        assigned_technician_id: None,
    }
}

/// Stores an active weekly subscription without generating jobs.
pub fn seed_subscription(persistence: &mut Persistence, anchor_date: Date) -> Subscription {
    let (client, location) = seed_client(persistence);
    persistence
        .insert_subscription(&create_test_subscription(
            &client,
            &location,
            Frequency::Weekly,
            None,
            anchor_date,
        ))
        .unwrap()
}

pub fn create_test_job(subscription: &Subscription, scheduled_date: Date) -> NewJob {
    NewJob::for_subscription(subscription, scheduled_date, "materializer:test", scheduled_date)
}
