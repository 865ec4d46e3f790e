// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit snapshot rendering.

use fieldsched_audit::StateSnapshot;
use fieldsched_domain::{Job, ScheduleState, Subscription, Suggestion, weekday_name};

fn optional_id(value: Option<i64>) -> String {
    value.map_or_else(|| String::from("none"), |id| id.to_string())
}

/// Renders the schedule-relevant fields of a subscription.
#[must_use]
pub fn subscription_snapshot(subscription: &Subscription) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={} frequency={} preferred_day={} price_cents={} technician={} cleanup_completed={}",
        subscription.status,
        subscription.frequency,
        subscription
            .preferred_day
            .map_or("none", weekday_name),
        subscription.price_cents,
        optional_id(subscription.assigned_technician_id),
        subscription.initial_cleanup_completed,
    ))
}

/// Renders a job's status and routing.
#[must_use]
pub fn job_snapshot(job: &Job) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={} scheduled_date={} assigned_to={} route_id={}",
        job.status,
        job.scheduled_date,
        optional_id(job.assigned_to),
        optional_id(job.route_id),
    ))
}

/// Renders a day/technician snapshot.
#[must_use]
pub fn schedule_state_text(state: &ScheduleState) -> String {
    format!(
        "day={} technician={}",
        state.preferred_day.map_or("none", weekday_name),
        optional_id(state.technician_id)
    )
}

/// Renders a suggestion's resolution status.
#[must_use]
pub fn suggestion_snapshot(suggestion: &Suggestion) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={} type={} suggested={}",
        suggestion.status,
        suggestion.suggestion_type,
        schedule_state_text(&suggestion.suggested_state)
    ))
}
