// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fieldsched::{EngineConfig, RequestContext};
use fieldsched_audit::{Actor, Cause};
use fieldsched_persistence::Persistence;
use time::Date;
use time::macros::date;

use crate::{
    CreateClientRequest, CreateClientResponse, CreateLocationRequest, CreateLocationResponse,
    CreateSubscriptionRequest, SubscriptionChangeResponse, create_client, create_location,
    create_subscription,
};

pub const ORG: i64 = 1;

/// Monday.
pub const TODAY: Date = date!(2024 - 03 - 04);

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_staff_context(today: Date) -> RequestContext {
    RequestContext::new(ORG, today, Actor::staff("dispatcher-1"), create_test_cause())
}

pub fn create_billing_context(today: Date) -> RequestContext {
    RequestContext::new(
        ORG,
        today,
        Actor::billing("stripe"),
        Cause::new(String::from("evt_123"), String::from("Billing webhook")),
    )
}

pub fn create_foreign_context() -> RequestContext {
    RequestContext::new(2, TODAY, Actor::staff("intruder"), create_test_cause())
}

/// Creates a client with one location through the API.
pub fn seed_client(persistence: &mut Persistence) -> (i64, i64) {
    let ctx: RequestContext = create_staff_context(TODAY);
    let client: CreateClientResponse = create_client(
        persistence,
        &ctx,
        &CreateClientRequest {
            name: String::from("Pat's Lawn"),
        },
    )
    .unwrap();
    let location: CreateLocationResponse = create_location(
        persistence,
        &ctx,
        &CreateLocationRequest {
            client_id: client.client_id,
            label: String::from("Front yard"),
        },
    )
    .unwrap();
    (client.client_id, location.location_id)
}

pub fn weekly_request(client_id: i64, location_id: i64, day: &str) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        client_id,
        location_id,
        frequency: String::from("weekly"),
        preferred_day: Some(day.to_string()),
        price_cents: 4500,
        status: None,
        initial_cleanup_required: false,
        assigned_technician_id: None,
    }
}

/// Creates a weekly Wednesday subscription on `TODAY`.
pub fn seed_wednesday_subscription(persistence: &mut Persistence) -> SubscriptionChangeResponse {
    let (client_id, location_id) = seed_client(persistence);
    create_subscription(
        persistence,
        &EngineConfig::default(),
        &create_staff_context(TODAY),
        &weekly_request(client_id, location_id, "Wednesday"),
    )
    .unwrap()
}
