// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{NewSubscription, Subscription, format_iso_date, weekday_name};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a subscription and returns the stored record.
///
/// # Errors
///
/// Returns an error if the client or location does not exist or the insert
/// fails.
pub fn insert_subscription(
    conn: &mut SqliteConnection,
    new: &NewSubscription,
) -> Result<Subscription, PersistenceError> {
    diesel::insert_into(subscriptions::table)
        .values((
            subscriptions::organization_id.eq(new.organization_id),
            subscriptions::client_id.eq(new.client_id),
            subscriptions::location_id.eq(new.location_id),
            subscriptions::frequency.eq(new.frequency.as_str()),
            subscriptions::preferred_day.eq(new.preferred_day.map(weekday_name)),
            subscriptions::status.eq(new.status.as_str()),
            subscriptions::price_cents.eq(new.price_cents),
            subscriptions::anchor_date.eq(format_iso_date(new.anchor_date)),
            subscriptions::initial_cleanup_required.eq(i32::from(new.initial_cleanup_required)),
            subscriptions::initial_cleanup_completed.eq(0),
            subscriptions::assigned_technician_id.eq(new.assigned_technician_id),
        ))
        .execute(conn)?;

    let subscription_id: i64 = get_last_insert_rowid(conn)?;
    info!(subscription_id, "Inserted subscription");
    queries::subscriptions::get_subscription(conn, subscription_id)
}

/// Overwrites the mutable columns of a subscription.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the subscription does not exist.
pub fn update_subscription(
    conn: &mut SqliteConnection,
    subscription: &Subscription,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        subscriptions::table
            .filter(subscriptions::subscription_id.eq(subscription.subscription_id)),
    )
    .set((
        subscriptions::frequency.eq(subscription.frequency.as_str()),
        subscriptions::preferred_day.eq(subscription.preferred_day.map(weekday_name)),
        subscriptions::status.eq(subscription.status.as_str()),
        subscriptions::price_cents.eq(subscription.price_cents),
        subscriptions::initial_cleanup_required
            .eq(i32::from(subscription.initial_cleanup_required)),
        subscriptions::initial_cleanup_completed
            .eq(i32::from(subscription.initial_cleanup_completed)),
        subscriptions::assigned_technician_id.eq(subscription.assigned_technician_id),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "subscription {}",
            subscription.subscription_id
        )));
    }

    debug!(
        subscription_id = subscription.subscription_id,
        status = %subscription.status,
        "Updated subscription"
    );
    Ok(())
}
