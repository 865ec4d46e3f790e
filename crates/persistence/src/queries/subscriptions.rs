// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::Subscription;

use crate::data_models::SubscriptionRow;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;

/// Retrieves a subscription by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the subscription does not exist,
/// or a reconstruction error if a stored column is invalid.
pub fn get_subscription(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<Subscription, PersistenceError> {
    subscriptions::table
        .filter(subscriptions::subscription_id.eq(subscription_id))
        .select(SubscriptionRow::as_select())
        .first::<SubscriptionRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("subscription {subscription_id}")))?
        .into_domain()
}

/// Lists an organization's subscriptions ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_subscriptions(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<Subscription>, PersistenceError> {
    subscriptions::table
        .filter(subscriptions::organization_id.eq(organization_id))
        .order(subscriptions::subscription_id.asc())
        .select(SubscriptionRow::as_select())
        .load::<SubscriptionRow>(conn)?
        .into_iter()
        .map(SubscriptionRow::into_domain)
        .collect()
}

/// Lists a client's subscriptions ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_subscriptions_for_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Vec<Subscription>, PersistenceError> {
    subscriptions::table
        .filter(subscriptions::client_id.eq(client_id))
        .order(subscriptions::subscription_id.asc())
        .select(SubscriptionRow::as_select())
        .load::<SubscriptionRow>(conn)?
        .into_iter()
        .map(SubscriptionRow::into_domain)
        .collect()
}
