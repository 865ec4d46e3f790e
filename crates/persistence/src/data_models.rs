// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and serialized column payloads.
//!
//! Rows mirror `diesel_schema` one-to-one and are converted into domain
//! records with `into_domain`. Enumerations and dates are stored as text,
//! so every conversion can fail with `PersistenceError::ReconstructionError`.

use diesel::prelude::*;
use fieldsched_domain::{
    Client, DomainError, Job, Location, Route, ScheduleState, Subscription, Suggestion,
    parse_iso_date, parse_weekday, weekday_name,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Weekday};

use crate::diesel_schema::{
    clients, jobs, locations, optimization_suggestions, routes, subscriptions,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Serializable representation of a suggestion's `ScheduleState`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleStateData {
    pub preferred_day: Option<String>,
    pub technician_id: Option<i64>,
}

impl ScheduleStateData {
    #[must_use]
    pub fn from_domain(state: &ScheduleState) -> Self {
        Self {
            preferred_day: state.preferred_day.map(|d| weekday_name(d).to_string()),
            technician_id: state.technician_id,
        }
    }

    pub fn into_domain(self) -> Result<ScheduleState, PersistenceError> {
        Ok(ScheduleState {
            preferred_day: parse_optional_weekday(self.preferred_day.as_deref())?,
            technician_id: self.technician_id,
        })
    }
}

fn reconstruction(err: &DomainError) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}

/// Parses a stored enumeration column.
pub fn parse_stored<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse::<T>().map_err(|e| reconstruction(&e))
}

/// Parses a stored `YYYY-MM-DD` column.
pub fn parse_stored_date(value: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value).map_err(|e| reconstruction(&e))
}

fn parse_optional_weekday(value: Option<&str>) -> Result<Option<Weekday>, PersistenceError> {
    value
        .map(parse_weekday)
        .transpose()
        .map_err(|e| reconstruction(&e))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = clients)]
pub struct ClientRow {
    pub client_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub is_active: i32,
}

impl ClientRow {
    #[must_use]
    pub fn into_domain(self) -> Client {
        Client {
            client_id: self.client_id,
            organization_id: self.organization_id,
            name: self.name,
            is_active: self.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = locations)]
pub struct LocationRow {
    pub location_id: i64,
    pub organization_id: i64,
    pub client_id: i64,
    pub label: String,
}

impl LocationRow {
    #[must_use]
    pub fn into_domain(self) -> Location {
        Location {
            location_id: self.location_id,
            organization_id: self.organization_id,
            client_id: self.client_id,
            label: self.label,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionRow {
    pub subscription_id: i64,
    pub organization_id: i64,
    pub client_id: i64,
    pub location_id: i64,
    pub frequency: String,
    pub preferred_day: Option<String>,
    pub status: String,
    pub price_cents: i64,
    pub anchor_date: String,
    pub initial_cleanup_required: i32,
    pub initial_cleanup_completed: i32,
    pub assigned_technician_id: Option<i64>,
}

impl SubscriptionRow {
    pub fn into_domain(self) -> Result<Subscription, PersistenceError> {
        Ok(Subscription {
            subscription_id: self.subscription_id,
            organization_id: self.organization_id,
            client_id: self.client_id,
            location_id: self.location_id,
            frequency: parse_stored(&self.frequency)?,
            preferred_day: parse_optional_weekday(self.preferred_day.as_deref())?,
            status: parse_stored(&self.status)?,
            price_cents: self.price_cents,
            anchor_date: parse_stored_date(&self.anchor_date)?,
            initial_cleanup_required: self.initial_cleanup_required != 0,
            initial_cleanup_completed: self.initial_cleanup_completed != 0,
            assigned_technician_id: self.assigned_technician_id,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = jobs)]
pub struct JobRow {
    pub job_id: i64,
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub client_id: i64,
    pub location_id: i64,
    pub scheduled_date: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub route_id: Option<i64>,
    pub route_order: Option<i32>,
    pub price_cents: i64,
    pub skip_reason: Option<String>,
    pub generated_by: String,
    pub generated_on: String,
}

impl JobRow {
    pub fn into_domain(self) -> Result<Job, PersistenceError> {
        Ok(Job {
            job_id: self.job_id,
            organization_id: self.organization_id,
            subscription_id: self.subscription_id,
            client_id: self.client_id,
            location_id: self.location_id,
            scheduled_date: parse_stored_date(&self.scheduled_date)?,
            status: parse_stored(&self.status)?,
            assigned_to: self.assigned_to,
            route_id: self.route_id,
            route_order: self.route_order,
            price_cents: self.price_cents,
            skip_reason: self.skip_reason,
            generated_by: self.generated_by,
            generated_on: parse_stored_date(&self.generated_on)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = routes)]
pub struct RouteRow {
    pub route_id: i64,
    pub organization_id: i64,
    pub assigned_to: i64,
    pub route_date: String,
    pub status: String,
    pub name: String,
}

impl RouteRow {
    pub fn into_domain(self) -> Result<Route, PersistenceError> {
        Ok(Route {
            route_id: self.route_id,
            organization_id: self.organization_id,
            assigned_to: self.assigned_to,
            route_date: parse_stored_date(&self.route_date)?,
            status: parse_stored(&self.status)?,
            name: self.name,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = optimization_suggestions)]
pub struct SuggestionRow {
    pub suggestion_id: i64,
    pub organization_id: i64,
    pub subscription_id: Option<i64>,
    pub suggestion_type: String,
    pub current_state_json: String,
    pub suggested_state_json: String,
    pub reasoning: String,
    pub estimated_minutes_saved: Option<i32>,
    pub status: String,
}

impl SuggestionRow {
    pub fn into_domain(self) -> Result<Suggestion, PersistenceError> {
        let current: ScheduleStateData = serde_json::from_str(&self.current_state_json)?;
        let suggested: ScheduleStateData = serde_json::from_str(&self.suggested_state_json)?;

        Ok(Suggestion {
            suggestion_id: self.suggestion_id,
            organization_id: self.organization_id,
            subscription_id: self.subscription_id,
            suggestion_type: parse_stored(&self.suggestion_type)?,
            current_state: current.into_domain()?,
            suggested_state: suggested.into_domain()?,
            reasoning: self.reasoning,
            estimated_minutes_saved: self.estimated_minutes_saved,
            status: parse_stored(&self.status)?,
        })
    }
}
