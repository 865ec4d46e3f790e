// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity records for subscriptions, jobs, routes and suggestions.
//!
//! Records carry their canonical numeric identifiers as assigned by the
//! store. `New*` records describe rows that have not been persisted yet.

use crate::types::{
    Frequency, JobStatus, RouteStatus, SubscriptionStatus, SuggestionStatus, SuggestionType,
};
use time::{Date, Weekday};

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub client_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub is_active: bool,
}

/// A service address belonging to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub location_id: i64,
    pub organization_id: i64,
    pub client_id: i64,
    pub label: String,
}

/// A recurring service agreement.
///
/// Invariant: at most one job with a non-canceled status exists per
/// `(subscription_id, scheduled_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub subscription_id: i64,
    pub organization_id: i64,
    pub client_id: i64,
    pub location_id: i64,
    pub frequency: Frequency,
    pub preferred_day: Option<Weekday>,
    pub status: SubscriptionStatus,
    pub price_cents: i64,
    /// The creation date; reference point for biweekly and monthly rules.
    pub anchor_date: Date,
    pub initial_cleanup_required: bool,
    pub initial_cleanup_completed: bool,
    /// Default technician whose routes receive newly generated jobs.
    pub assigned_technician_id: Option<i64>,
}

impl Subscription {
    /// Returns whether the subscription's schedule differs from `other`'s.
    ///
    /// Only frequency and preferred day shape the schedule; price and
    /// status do not.
    #[must_use]
    pub fn schedule_differs_from(&self, other: &Self) -> bool {
        self.frequency != other.frequency || self.preferred_day != other.preferred_day
    }

    /// Returns whether the initial cleanup visit is still outstanding.
    #[must_use]
    pub const fn cleanup_outstanding(&self) -> bool {
        self.initial_cleanup_required && !self.initial_cleanup_completed
    }
}

/// A subscription that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub organization_id: i64,
    pub client_id: i64,
    pub location_id: i64,
    pub frequency: Frequency,
    pub preferred_day: Option<Weekday>,
    pub status: SubscriptionStatus,
    pub price_cents: i64,
    pub anchor_date: Date,
    pub initial_cleanup_required: bool,
    pub assigned_technician_id: Option<i64>,
}

/// One concrete, dated unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_id: i64,
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub client_id: i64,
    pub location_id: i64,
    pub scheduled_date: Date,
    pub status: JobStatus,
    pub assigned_to: Option<i64>,
    /// Weak reference to the grouping route; the route never lists its jobs.
    pub route_id: Option<i64>,
    pub route_order: Option<i32>,
    pub price_cents: i64,
    /// Skip or cancellation reason.
    pub skip_reason: Option<String>,
    /// What generated this job (e.g. `"materializer:UpdateSubscription"`).
    pub generated_by: String,
    /// The business date on which the job was generated.
    pub generated_on: Date,
}

/// A job that has not been persisted yet. New jobs are always `Scheduled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub client_id: i64,
    pub location_id: i64,
    pub scheduled_date: Date,
    pub price_cents: i64,
    pub generated_by: String,
    pub generated_on: Date,
}

impl NewJob {
    /// Builds the job a subscription owes on `scheduled_date`.
    ///
    /// The price is copied from the subscription at generation time, so later
    /// price changes apply only to jobs generated afterwards.
    #[must_use]
    pub fn for_subscription(
        subscription: &Subscription,
        scheduled_date: Date,
        generated_by: &str,
        generated_on: Date,
    ) -> Self {
        Self {
            organization_id: subscription.organization_id,
            subscription_id: Some(subscription.subscription_id),
            client_id: subscription.client_id,
            location_id: subscription.location_id,
            scheduled_date,
            price_cents: subscription.price_cents,
            generated_by: generated_by.to_string(),
            generated_on,
        }
    }
}

/// A technician's grouping of stops for one calendar date.
///
/// Unique per `(assigned_to, route_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_id: i64,
    pub organization_id: i64,
    pub assigned_to: i64,
    pub route_date: Date,
    pub status: RouteStatus,
    pub name: String,
}

/// A route that has not been persisted yet. New routes are always `Planned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    pub organization_id: i64,
    pub assigned_to: i64,
    pub route_date: Date,
    pub name: String,
}

/// Day and technician snapshot carried by a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleState {
    pub preferred_day: Option<Weekday>,
    pub technician_id: Option<i64>,
}

impl ScheduleState {
    /// Returns whether the snapshot names neither a day nor a technician.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.preferred_day.is_none() && self.technician_id.is_none()
    }
}

/// An externally proposed schedule change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub suggestion_id: i64,
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub suggestion_type: SuggestionType,
    pub current_state: ScheduleState,
    pub suggested_state: ScheduleState,
    pub reasoning: String,
    pub estimated_minutes_saved: Option<i32>,
    pub status: SuggestionStatus,
}

/// A suggestion that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub suggestion_type: SuggestionType,
    pub current_state: ScheduleState,
    pub suggested_state: ScheduleState,
    pub reasoning: String,
    pub estimated_minutes_saved: Option<i32>,
}
