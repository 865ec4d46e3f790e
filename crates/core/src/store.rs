// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage seam of the engine.
//!
//! `JobStore` is the only way the engine reads or writes persistent state.
//! Implementations must enforce two uniqueness rules themselves and report
//! violations as [`StoreError::Conflict`]:
//!
//! - at most one job with a non-canceled status per `(subscription, date)`
//! - at most one route per `(technician, date)`

use crate::error::CoreError;
use fieldsched_audit::{AuditEvent, AuditSubject};
use fieldsched_domain::{
    Client, Job, Location, NewJob, NewRoute, NewSubscription, NewSuggestion, Route,
    Subscription, Suggestion, SuggestionStatus,
};
use time::Date;

/// Errors reported by a `JobStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested row does not exist.
    NotFound(String),
    /// A uniqueness rule rejected the write.
    Conflict(String),
    /// The backend failed. The operation may be retried.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Backend(msg) => write!(f, "Storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage operations used by the engine.
///
/// Reads by id return `StoreError::NotFound` for unknown ids; organization
/// scoping is checked by the engine, not the store.
pub trait JobStore {
    fn get_client(&mut self, client_id: i64) -> Result<Client, StoreError>;

    fn list_clients(&mut self, organization_id: i64) -> Result<Vec<Client>, StoreError>;

    fn set_client_active(&mut self, client_id: i64, is_active: bool) -> Result<(), StoreError>;

    fn get_location(&mut self, location_id: i64) -> Result<Location, StoreError>;

    fn list_locations(&mut self, organization_id: i64) -> Result<Vec<Location>, StoreError>;

    fn get_subscription(&mut self, subscription_id: i64) -> Result<Subscription, StoreError>;

    fn list_subscriptions(&mut self, organization_id: i64)
    -> Result<Vec<Subscription>, StoreError>;

    fn list_subscriptions_for_client(
        &mut self,
        client_id: i64,
    ) -> Result<Vec<Subscription>, StoreError>;

    fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, StoreError>;

    /// Overwrites every mutable column of the subscription.
    fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError>;

    /// Returns the job occupying `(subscription_id, date)`, if any.
    fn find_live_job(
        &mut self,
        subscription_id: i64,
        date: Date,
    ) -> Result<Option<Job>, StoreError>;

    /// Inserts a `Scheduled` job.
    ///
    /// Returns `StoreError::Conflict` when a live job already holds the slot.
    fn insert_job(&mut self, job: &NewJob) -> Result<Job, StoreError>;

    fn get_job(&mut self, job_id: i64) -> Result<Job, StoreError>;

    /// Lists a subscription's jobs ordered by date, optionally only those
    /// dated on or after `from`.
    fn list_jobs_for_subscription(
        &mut self,
        subscription_id: i64,
        from: Option<Date>,
    ) -> Result<Vec<Job>, StoreError>;

    /// Cancels a job if it is still voidable, detaching it from its route.
    ///
    /// Returns `false` when the job had already moved past a voidable status.
    fn cancel_job(&mut self, job_id: i64, reason: &str) -> Result<bool, StoreError>;

    /// Binds a job to a technician's route at the given stop position.
    fn attach_job_to_route(
        &mut self,
        job_id: i64,
        technician_id: i64,
        route_id: i64,
        route_order: i32,
    ) -> Result<(), StoreError>;

    /// Finds the organization's route for a technician on `date`.
    fn find_route(
        &mut self,
        organization_id: i64,
        technician_id: i64,
        date: Date,
    ) -> Result<Option<Route>, StoreError>;

    /// Inserts a `Planned` route.
    ///
    /// Returns `StoreError::Conflict` when the technician already has a route
    /// on that date in the same organization.
    fn insert_route(&mut self, route: &NewRoute) -> Result<Route, StoreError>;

    fn get_route(&mut self, route_id: i64) -> Result<Route, StoreError>;

    /// Counts jobs currently attached to the route.
    fn count_route_stops(&mut self, route_id: i64) -> Result<i64, StoreError>;

    fn insert_suggestion(&mut self, suggestion: &NewSuggestion)
    -> Result<Suggestion, StoreError>;

    fn get_suggestion(&mut self, suggestion_id: i64) -> Result<Suggestion, StoreError>;

    /// Moves a suggestion from `from` to `to` only if it is still in `from`.
    ///
    /// Returns whether the row changed.
    fn transition_suggestion(
        &mut self,
        suggestion_id: i64,
        from: SuggestionStatus,
        to: SuggestionStatus,
    ) -> Result<bool, StoreError>;

    /// Persists an audit event and returns its identifier.
    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, StoreError>;

    /// Lists audit events for a subject in insertion order.
    fn list_audit_events(&mut self, subject: &AuditSubject)
    -> Result<Vec<AuditEvent>, StoreError>;
}

/// Maps a lookup failure, treating a missing row as `CoreError::NotFound`.
fn lookup_error(entity: &'static str, id: i64, operation: &str, err: StoreError) -> CoreError {
    match err {
        StoreError::NotFound(_) => CoreError::NotFound { entity, id },
        other => CoreError::storage(operation, 0, other),
    }
}

/// Loads a subscription owned by `organization_id`.
pub(crate) fn require_subscription<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    subscription_id: i64,
) -> Result<Subscription, CoreError> {
    let subscription: Subscription = store
        .get_subscription(subscription_id)
        .map_err(|e| lookup_error("subscription", subscription_id, "loading subscription", e))?;
    if subscription.organization_id != organization_id {
        return Err(CoreError::NotFound {
            entity: "subscription",
            id: subscription_id,
        });
    }
    Ok(subscription)
}

/// Loads a job owned by `organization_id`.
pub(crate) fn require_job<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    job_id: i64,
) -> Result<Job, CoreError> {
    let job: Job = store
        .get_job(job_id)
        .map_err(|e| lookup_error("job", job_id, "loading job", e))?;
    if job.organization_id != organization_id {
        return Err(CoreError::NotFound {
            entity: "job",
            id: job_id,
        });
    }
    Ok(job)
}

/// Loads a client owned by `organization_id`.
pub(crate) fn require_client<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    client_id: i64,
) -> Result<Client, CoreError> {
    let client: Client = store
        .get_client(client_id)
        .map_err(|e| lookup_error("client", client_id, "loading client", e))?;
    if client.organization_id != organization_id {
        return Err(CoreError::NotFound {
            entity: "client",
            id: client_id,
        });
    }
    Ok(client)
}

/// Loads a location owned by `organization_id`.
pub(crate) fn require_location<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    location_id: i64,
) -> Result<Location, CoreError> {
    let location: Location = store
        .get_location(location_id)
        .map_err(|e| lookup_error("location", location_id, "loading location", e))?;
    if location.organization_id != organization_id {
        return Err(CoreError::NotFound {
            entity: "location",
            id: location_id,
        });
    }
    Ok(location)
}

/// Loads a suggestion owned by `organization_id`.
pub(crate) fn require_suggestion<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    suggestion_id: i64,
) -> Result<Suggestion, CoreError> {
    let suggestion: Suggestion = store
        .get_suggestion(suggestion_id)
        .map_err(|e| lookup_error("suggestion", suggestion_id, "loading suggestion", e))?;
    if suggestion.organization_id != organization_id {
        return Err(CoreError::NotFound {
            entity: "suggestion",
            id: suggestion_id,
        });
    }
    Ok(suggestion)
}
