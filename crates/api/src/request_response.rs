// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Enumerations and dates cross the boundary as text and are parsed
//! leniently by the handlers. Dates in responses are `YYYY-MM-DD`.

use fieldsched::{AttentionItem, AttentionReason, LifecycleOutcome};
use fieldsched_audit::AuditEvent;
use fieldsched_domain::{Job, Subscription, Suggestion, format_iso_date, weekday_name};
use serde::{Deserialize, Serialize};

/// API request to create a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
}

/// API response for a created client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClientResponse {
    pub client_id: i64,
    pub name: String,
    pub message: String,
}

/// API request to add a service location to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    pub client_id: i64,
    pub label: String,
}

/// API response for a created location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocationResponse {
    pub location_id: i64,
    pub client_id: i64,
    pub label: String,
    pub message: String,
}

/// API request to create a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub client_id: i64,
    pub location_id: i64,
    /// `weekly`, `biweekly`, `monthly` or `one_time`.
    pub frequency: String,
    pub preferred_day: Option<String>,
    pub price_cents: i64,
    /// Initial status; `Active` when omitted.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub initial_cleanup_required: bool,
    #[serde(default)]
    pub assigned_technician_id: Option<i64>,
}

/// API request to edit a subscription.
///
/// Absent fields are left unchanged. `clear_preferred_day` and
/// `clear_technician` remove the respective value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateSubscriptionRequest {
    pub subscription_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub preferred_day: Option<String>,
    #[serde(default)]
    pub clear_preferred_day: bool,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub initial_cleanup_completed: Option<bool>,
    #[serde(default)]
    pub assigned_technician_id: Option<i64>,
    #[serde(default)]
    pub clear_technician: bool,
}

/// A payment-processor lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingEventRequest {
    pub subscription_id: i64,
    /// Event kind, optionally prefixed (`subscription.paused`).
    pub event_type: String,
    /// The processor's own status string for `created`/`updated` events.
    #[serde(default)]
    pub processor_status: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// API request to rerun the materializer for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateJobsRequest {
    pub subscription_id: i64,
}

/// A subscription as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub subscription_id: i64,
    pub client_id: i64,
    pub location_id: i64,
    pub frequency: String,
    pub preferred_day: Option<String>,
    pub status: String,
    pub price_cents: i64,
    pub anchor_date: String,
    pub initial_cleanup_required: bool,
    pub initial_cleanup_completed: bool,
    pub assigned_technician_id: Option<i64>,
}

impl From<&Subscription> for SubscriptionInfo {
    fn from(subscription: &Subscription) -> Self {
        Self {
            subscription_id: subscription.subscription_id,
            client_id: subscription.client_id,
            location_id: subscription.location_id,
            frequency: subscription.frequency.to_string(),
            preferred_day: subscription
                .preferred_day
                .map(|day| weekday_name(day).to_string()),
            status: subscription.status.to_string(),
            price_cents: subscription.price_cents,
            anchor_date: format_iso_date(subscription.anchor_date),
            initial_cleanup_required: subscription.initial_cleanup_required,
            initial_cleanup_completed: subscription.initial_cleanup_completed,
            assigned_technician_id: subscription.assigned_technician_id,
        }
    }
}

/// API response for any change that runs through the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionChangeResponse {
    pub subscription: SubscriptionInfo,
    pub jobs_voided: usize,
    pub jobs_generated: usize,
    pub jobs_assigned: usize,
    /// Service days that could not be filled; rerun regeneration to retry.
    pub failed_dates: Vec<String>,
    pub warnings: Vec<String>,
    pub client_deactivated: bool,
    /// `None` when nothing changed.
    pub audit_event_id: Option<i64>,
    /// Staff-facing summary, e.g. "3 jobs voided / 2 jobs generated".
    pub message: String,
}

impl From<&LifecycleOutcome> for SubscriptionChangeResponse {
    fn from(outcome: &LifecycleOutcome) -> Self {
        Self {
            subscription: SubscriptionInfo::from(&outcome.subscription),
            jobs_voided: outcome.voided,
            jobs_generated: outcome.generated,
            jobs_assigned: outcome.assigned,
            failed_dates: outcome
                .failed_dates
                .iter()
                .map(|date| format_iso_date(*date))
                .collect(),
            warnings: outcome.warnings.clone(),
            client_deactivated: outcome.client_deactivated,
            audit_event_id: outcome.audit_event_id,
            message: outcome.summary(),
        }
    }
}

/// API request to place one job on a technician's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignJobRequest {
    pub job_id: i64,
    pub technician_id: i64,
    /// Must equal the job's scheduled date.
    pub route_date: String,
}

/// API response for a single job assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignJobResponse {
    pub job_id: i64,
    pub route_id: i64,
    pub route_order: i32,
    pub route_created: bool,
    pub changed: bool,
    pub audit_event_id: Option<i64>,
    pub message: String,
}

/// API request to route every unassigned future job of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSubscriptionJobsRequest {
    pub subscription_id: i64,
    pub technician_id: i64,
}

/// API response for a bulk assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSubscriptionJobsResponse {
    pub subscription_id: i64,
    pub jobs_assigned: usize,
    pub routes_created: usize,
    pub audit_event_id: Option<i64>,
    pub message: String,
}

/// API request to list a subscription's jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListJobsRequest {
    pub subscription_id: i64,
    /// Only jobs on or after this `YYYY-MM-DD` date.
    #[serde(default)]
    pub from: Option<String>,
}

/// A job as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: i64,
    pub scheduled_date: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub route_id: Option<i64>,
    pub route_order: Option<i32>,
    pub price_cents: i64,
    pub skip_reason: Option<String>,
    pub generated_by: String,
}

impl From<&Job> for JobInfo {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.job_id,
            scheduled_date: format_iso_date(job.scheduled_date),
            status: job.status.to_string(),
            assigned_to: job.assigned_to,
            route_id: job.route_id,
            route_order: job.route_order,
            price_cents: job.price_cents,
            skip_reason: job.skip_reason.clone(),
            generated_by: job.generated_by.clone(),
        }
    }
}

/// API response listing a subscription's jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListJobsResponse {
    pub subscription_id: i64,
    pub jobs: Vec<JobInfo>,
}

/// One reason a worklist item needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionReasonInfo {
    /// Stable machine-readable code.
    pub code: String,
    pub description: String,
}

impl From<&AttentionReason> for AttentionReasonInfo {
    fn from(reason: &AttentionReason) -> Self {
        Self {
            code: reason.code().to_string(),
            description: reason.to_string(),
        }
    }
}

/// One worklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistItemInfo {
    pub client_id: i64,
    pub location_id: i64,
    pub subscription_id: Option<i64>,
    pub reasons: Vec<AttentionReasonInfo>,
}

impl From<&AttentionItem> for WorklistItemInfo {
    fn from(item: &AttentionItem) -> Self {
        Self {
            client_id: item.client_id,
            location_id: item.location_id,
            subscription_id: item.subscription_id,
            reasons: item.reasons.iter().map(AttentionReasonInfo::from).collect(),
        }
    }
}

/// API response for the staff worklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistResponse {
    /// The business date the worklist was computed for.
    pub as_of: String,
    pub items: Vec<WorklistItemInfo>,
}

/// API request to record an optimization suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSuggestionRequest {
    #[serde(default)]
    pub subscription_id: Option<i64>,
    pub suggestion_type: String,
    #[serde(default)]
    pub current_day: Option<String>,
    #[serde(default)]
    pub current_technician_id: Option<i64>,
    #[serde(default)]
    pub suggested_day: Option<String>,
    #[serde(default)]
    pub suggested_technician_id: Option<i64>,
    pub reasoning: String,
    #[serde(default)]
    pub estimated_minutes_saved: Option<i32>,
}

/// A suggestion as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionInfo {
    pub suggestion_id: i64,
    pub subscription_id: Option<i64>,
    pub suggestion_type: String,
    pub status: String,
    pub suggested_day: Option<String>,
    pub suggested_technician_id: Option<i64>,
    pub reasoning: String,
    pub estimated_minutes_saved: Option<i32>,
}

impl From<&Suggestion> for SuggestionInfo {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            suggestion_id: suggestion.suggestion_id,
            subscription_id: suggestion.subscription_id,
            suggestion_type: suggestion.suggestion_type.to_string(),
            status: suggestion.status.to_string(),
            suggested_day: suggestion
                .suggested_state
                .preferred_day
                .map(|day| weekday_name(day).to_string()),
            suggested_technician_id: suggestion.suggested_state.technician_id,
            reasoning: suggestion.reasoning.clone(),
            estimated_minutes_saved: suggestion.estimated_minutes_saved,
        }
    }
}

/// API request to accept or dismiss a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSuggestionRequest {
    pub suggestion_id: i64,
}

/// API response for recording or resolving a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: SuggestionInfo,
    /// The schedule change applied on acceptance.
    pub change: Option<SubscriptionChangeResponse>,
    pub message: String,
}

/// API request for the audit history of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHistoryRequest {
    /// `client`, `subscription`, `job`, `route` or `suggestion`.
    pub subject_kind: String,
    pub subject_id: i64,
}

/// One audit record as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub subject: String,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            subject: event.subject.to_string(),
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
        }
    }
}

/// API response for an audit history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHistoryResponse {
    pub subject: String,
    pub events: Vec<AuditEventInfo>,
}
