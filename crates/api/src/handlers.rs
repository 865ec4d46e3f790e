// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler takes the caller's [`RequestContext`]; ids that belong to
//! another organization are reported as not found.

use std::str::FromStr;

use fieldsched::{
    AssignOutcome, AssignmentResult, AttentionItem, EngineConfig, JobAssignment, JobStore,
    LifecycleOutcome, RequestContext, StoreError, SubscriptionChange, SuggestionResolution,
};
use fieldsched_audit::{AuditEvent, AuditSubject, SubjectKind};
use fieldsched_domain::{
    BillingEventKind, Client, DomainError, Frequency, Job, Location, NewSubscription,
    NewSuggestion, ScheduleState, SubscriptionStatus, Suggestion, SuggestionType,
    format_iso_date, parse_iso_date, parse_weekday,
};
use fieldsched_persistence::Persistence;
use time::{Date, Weekday};
use tracing::{debug, info, warn};

use crate::error::{
    ApiError, RequestError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use crate::request_response::{
    AssignJobRequest, AssignJobResponse, AssignSubscriptionJobsRequest,
    AssignSubscriptionJobsResponse, AuditEventInfo, AuditHistoryRequest, AuditHistoryResponse,
    BillingEventRequest, CreateClientRequest, CreateClientResponse, CreateLocationRequest,
    CreateLocationResponse, CreateSubscriptionRequest, JobInfo, ListJobsRequest,
    ListJobsResponse, RecordSuggestionRequest, RegenerateJobsRequest, ResolveSuggestionRequest,
    SubscriptionChangeResponse, SubscriptionInfo, SuggestionInfo, SuggestionResponse,
    UpdateSubscriptionRequest, WorklistItemInfo, WorklistResponse,
};

fn parse_field<T: FromStr<Err = DomainError>>(value: &str) -> Result<T, ApiError> {
    value.parse::<T>().map_err(|e| translate_domain_error(&e))
}

fn parse_optional_weekday(value: Option<&str>) -> Result<Option<Weekday>, ApiError> {
    value
        .map(parse_weekday)
        .transpose()
        .map_err(|e| translate_domain_error(&e))
}

fn parse_date(value: &str) -> Result<Date, ApiError> {
    parse_iso_date(value).map_err(|e| translate_domain_error(&e))
}

fn require_text(value: &str, field: &'static str) -> Result<String, ApiError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(RequestError::EmptyField { field }.into());
    }
    Ok(trimmed.to_string())
}

fn change_response(outcome: &LifecycleOutcome) -> SubscriptionChangeResponse {
    if outcome.is_degraded() {
        warn!(
            subscription_id = outcome.subscription.subscription_id,
            warnings = outcome.warnings.len(),
            failed_dates = outcome.failed_dates.len(),
            "Subscription change completed with partial effects"
        );
    }
    SubscriptionChangeResponse::from(outcome)
}

// ============================================================================
// Clients & Locations
// ============================================================================

/// Creates an active client in the caller's organization.
///
/// # Errors
///
/// Returns an error if the name is blank or the insert fails.
pub fn create_client(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateClientRequest,
) -> Result<CreateClientResponse, ApiError> {
    let name: String = require_text(&request.name, "name")?;
    let client: Client = persistence
        .create_client(ctx.organization_id, &name)
        .map_err(translate_persistence_error)?;

    info!(client_id = client.client_id, "Created client");

    Ok(CreateClientResponse {
        client_id: client.client_id,
        message: format!("Created client '{}'", client.name),
        name: client.name,
    })
}

/// Adds a service location to a client of the caller's organization.
///
/// # Errors
///
/// Returns an error if the label is blank or the client is unknown to the
/// caller's organization.
pub fn create_location(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateLocationRequest,
) -> Result<CreateLocationResponse, ApiError> {
    let label: String = require_text(&request.label, "label")?;

    let visible: bool = match persistence.get_client(request.client_id) {
        Ok(client) => client.organization_id == ctx.organization_id,
        Err(StoreError::NotFound(_)) => false,
        Err(e) => {
            return Err(ApiError::Internal {
                message: format!("Failed to look up client {}: {e}", request.client_id),
            });
        }
    };
    if !visible {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Client"),
            message: format!("client {} does not exist", request.client_id),
        });
    }

    let location: Location = persistence
        .create_location(request.client_id, &label)
        .map_err(translate_persistence_error)?;

    info!(
        location_id = location.location_id,
        client_id = location.client_id,
        "Created location"
    );

    Ok(CreateLocationResponse {
        location_id: location.location_id,
        client_id: location.client_id,
        message: format!("Added location '{}'", location.label),
        label: location.label,
    })
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Creates a subscription anchored on the caller's business date and
/// materializes its first window of jobs.
///
/// # Errors
///
/// Returns an error if a field is invalid, the client or location is
/// unknown, or the location belongs to another client.
pub fn create_subscription(
    persistence: &mut Persistence,
    config: &EngineConfig,
    ctx: &RequestContext,
    request: &CreateSubscriptionRequest,
) -> Result<SubscriptionChangeResponse, ApiError> {
    let frequency: Frequency = parse_field(&request.frequency)?;
    let preferred_day: Option<Weekday> = parse_optional_weekday(request.preferred_day.as_deref())?;
    let status: SubscriptionStatus = request
        .status
        .as_deref()
        .map_or(Ok(SubscriptionStatus::Active), parse_field)?;

    let new_subscription: NewSubscription = NewSubscription {
        organization_id: ctx.organization_id,
        client_id: request.client_id,
        location_id: request.location_id,
        frequency,
        preferred_day,
        status,
        price_cents: request.price_cents,
        anchor_date: ctx.today,
        initial_cleanup_required: request.initial_cleanup_required,
        assigned_technician_id: request.assigned_technician_id,
    };

    let outcome: LifecycleOutcome =
        fieldsched::create_subscription(persistence, config, ctx, &new_subscription)
            .map_err(translate_core_error)?;
    Ok(change_response(&outcome))
}

/// Applies a staff edit to a subscription.
///
/// # Errors
///
/// Returns an error if a field is invalid, a value is both set and
/// cleared, or the subscription is unknown.
pub fn update_subscription(
    persistence: &mut Persistence,
    config: &EngineConfig,
    ctx: &RequestContext,
    request: &UpdateSubscriptionRequest,
) -> Result<SubscriptionChangeResponse, ApiError> {
    if request.clear_preferred_day && request.preferred_day.is_some() {
        return Err(RequestError::SetAndClear {
            field: "preferred_day",
        }
        .into());
    }
    if request.clear_technician && request.assigned_technician_id.is_some() {
        return Err(RequestError::SetAndClear {
            field: "assigned_technician_id",
        }
        .into());
    }

    let preferred_day: Option<Option<Weekday>> = if request.clear_preferred_day {
        Some(None)
    } else {
        parse_optional_weekday(request.preferred_day.as_deref())?.map(Some)
    };
    let assigned_technician_id: Option<Option<i64>> = if request.clear_technician {
        Some(None)
    } else {
        request.assigned_technician_id.map(Some)
    };

    let change: SubscriptionChange = SubscriptionChange {
        status: request.status.as_deref().map(parse_field).transpose()?,
        frequency: request.frequency.as_deref().map(parse_field).transpose()?,
        preferred_day,
        price_cents: request.price_cents,
        initial_cleanup_completed: request.initial_cleanup_completed,
        assigned_technician_id,
    };

    let outcome: LifecycleOutcome = fieldsched::update_subscription(
        persistence,
        config,
        ctx,
        request.subscription_id,
        &change,
    )
    .map_err(translate_core_error)?;
    Ok(change_response(&outcome))
}

/// Applies a payment-processor lifecycle event to a subscription.
///
/// Redelivered events whose status is already current are accepted and
/// report zero counts.
///
/// # Errors
///
/// Returns an error if the event kind or processor status is unknown, or
/// the subscription is unknown.
pub fn apply_billing_event(
    persistence: &mut Persistence,
    config: &EngineConfig,
    ctx: &RequestContext,
    request: &BillingEventRequest,
) -> Result<SubscriptionChangeResponse, ApiError> {
    let kind: BillingEventKind = parse_field(&request.event_type)?;
    debug!(
        subscription_id = request.subscription_id,
        event = %kind,
        cause = %ctx.cause.id,
        "Received billing event"
    );

    let outcome: LifecycleOutcome = fieldsched::apply_billing_event(
        persistence,
        config,
        ctx,
        request.subscription_id,
        kind,
        request.processor_status.as_deref(),
        request.cancel_at_period_end,
    )
    .map_err(translate_core_error)?;
    Ok(change_response(&outcome))
}

/// Re-runs job generation and default-technician routing for a
/// subscription.
///
/// # Errors
///
/// Returns an error if the subscription is unknown.
pub fn regenerate_jobs(
    persistence: &mut Persistence,
    config: &EngineConfig,
    ctx: &RequestContext,
    request: &RegenerateJobsRequest,
) -> Result<SubscriptionChangeResponse, ApiError> {
    let outcome: LifecycleOutcome =
        fieldsched::regenerate_jobs(persistence, config, ctx, request.subscription_id)
            .map_err(translate_core_error)?;
    Ok(change_response(&outcome))
}

/// Returns a single subscription.
///
/// # Errors
///
/// Returns an error if the subscription is unknown to the caller.
pub fn get_subscription(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    subscription_id: i64,
) -> Result<SubscriptionInfo, ApiError> {
    fieldsched::get_subscription(persistence, ctx.organization_id, subscription_id)
        .map(|subscription| SubscriptionInfo::from(&subscription))
        .map_err(translate_core_error)
}

// ============================================================================
// Jobs & Routes
// ============================================================================

/// Places one job on a technician's route for the job's date.
///
/// # Errors
///
/// Returns an error if the date is malformed or differs from the job's
/// scheduled date, the job is not assignable, or the job is unknown.
pub fn assign_job(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &AssignJobRequest,
) -> Result<AssignJobResponse, ApiError> {
    let route_date: Date = parse_date(&request.route_date)?;

    let result: AssignmentResult<JobAssignment> = fieldsched::assign_job(
        persistence,
        ctx,
        request.job_id,
        request.technician_id,
        route_date,
    )
    .map_err(translate_core_error)?;
    let assignment: JobAssignment = result.outcome;

    let message: String = if assignment.changed {
        format!(
            "Job {} is stop {} on route {}",
            assignment.job_id, assignment.route_order, assignment.route_id
        )
    } else {
        format!(
            "Job {} was already on route {}",
            assignment.job_id, assignment.route_id
        )
    };

    Ok(AssignJobResponse {
        job_id: assignment.job_id,
        route_id: assignment.route_id,
        route_order: assignment.route_order,
        route_created: assignment.route_created,
        changed: assignment.changed,
        audit_event_id: result.audit_event_id,
        message,
    })
}

/// Routes every unassigned future job of a subscription to a technician.
///
/// The subscription's default technician is left unchanged.
///
/// # Errors
///
/// Returns an error if the subscription is unknown or a route write fails.
pub fn assign_subscription_jobs(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &AssignSubscriptionJobsRequest,
) -> Result<AssignSubscriptionJobsResponse, ApiError> {
    let result: AssignmentResult<AssignOutcome> = fieldsched::assign_subscription_jobs(
        persistence,
        ctx,
        request.subscription_id,
        request.technician_id,
    )
    .map_err(translate_core_error)?;
    let outcome: AssignOutcome = result.outcome;

    Ok(AssignSubscriptionJobsResponse {
        subscription_id: request.subscription_id,
        jobs_assigned: outcome.count(),
        routes_created: outcome.routes_created,
        audit_event_id: result.audit_event_id,
        message: format!(
            "{} jobs assigned to technician {} across {} routes",
            outcome.count(),
            request.technician_id,
            outcome.routes.len()
        ),
    })
}

/// Lists a subscription's jobs in date order, including canceled ones.
///
/// # Errors
///
/// Returns an error if the date filter is malformed or the subscription is
/// unknown.
pub fn list_jobs(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ListJobsRequest,
) -> Result<ListJobsResponse, ApiError> {
    let from: Option<Date> = request.from.as_deref().map(parse_date).transpose()?;
    let jobs: Vec<Job> = fieldsched::list_subscription_jobs(
        persistence,
        ctx.organization_id,
        request.subscription_id,
        from,
    )
    .map_err(translate_core_error)?;

    Ok(ListJobsResponse {
        subscription_id: request.subscription_id,
        jobs: jobs.iter().map(JobInfo::from).collect(),
    })
}

/// Computes the staff worklist for the caller's business date.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn get_worklist(
    persistence: &mut Persistence,
    ctx: &RequestContext,
) -> Result<WorklistResponse, ApiError> {
    let items: Vec<AttentionItem> =
        fieldsched::detect_unassigned_work(persistence, ctx.organization_id, ctx.today)
            .map_err(translate_core_error)?;

    debug!(items = items.len(), "Computed worklist");

    Ok(WorklistResponse {
        as_of: format_iso_date(ctx.today),
        items: items.iter().map(WorklistItemInfo::from).collect(),
    })
}

// ============================================================================
// Optimization Suggestions
// ============================================================================

/// Records an externally computed suggestion as `Pending`.
///
/// # Errors
///
/// Returns an error if a field is invalid, the reasoning is blank, the
/// suggestion proposes nothing, or the subscription is unknown.
pub fn record_suggestion(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &RecordSuggestionRequest,
) -> Result<SuggestionResponse, ApiError> {
    let suggestion_type: SuggestionType = parse_field(&request.suggestion_type)?;
    let reasoning: String = require_text(&request.reasoning, "reasoning")?;

    let new_suggestion: NewSuggestion = NewSuggestion {
        organization_id: ctx.organization_id,
        subscription_id: request.subscription_id,
        suggestion_type,
        current_state: ScheduleState {
            preferred_day: parse_optional_weekday(request.current_day.as_deref())?,
            technician_id: request.current_technician_id,
        },
        suggested_state: ScheduleState {
            preferred_day: parse_optional_weekday(request.suggested_day.as_deref())?,
            technician_id: request.suggested_technician_id,
        },
        reasoning,
        estimated_minutes_saved: request.estimated_minutes_saved,
    };

    let suggestion: Suggestion = fieldsched::record_suggestion(persistence, ctx, &new_suggestion)
        .map_err(translate_core_error)?;

    Ok(SuggestionResponse {
        message: format!("Recorded suggestion {}", suggestion.suggestion_id),
        suggestion: SuggestionInfo::from(&suggestion),
        change: None,
    })
}

/// Accepts a pending suggestion and applies its schedule change.
///
/// # Errors
///
/// Returns `ApiError::Conflict` if the suggestion was already accepted or
/// dismissed, or an error if it is unknown.
pub fn accept_suggestion(
    persistence: &mut Persistence,
    config: &EngineConfig,
    ctx: &RequestContext,
    request: &ResolveSuggestionRequest,
) -> Result<SuggestionResponse, ApiError> {
    let resolution: SuggestionResolution =
        fieldsched::accept_suggestion(persistence, config, ctx, request.suggestion_id)
            .map_err(translate_core_error)?;
    Ok(resolution_response(&resolution, "Accepted"))
}

/// Dismisses a pending suggestion without touching any schedule.
///
/// # Errors
///
/// Returns `ApiError::Conflict` if the suggestion was already accepted or
/// dismissed, or an error if it is unknown.
pub fn dismiss_suggestion(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ResolveSuggestionRequest,
) -> Result<SuggestionResponse, ApiError> {
    let resolution: SuggestionResolution =
        fieldsched::dismiss_suggestion(persistence, ctx, request.suggestion_id)
            .map_err(translate_core_error)?;
    Ok(resolution_response(&resolution, "Dismissed"))
}

fn resolution_response(resolution: &SuggestionResolution, verb: &str) -> SuggestionResponse {
    let change: Option<SubscriptionChangeResponse> =
        resolution.lifecycle.as_ref().map(change_response);
    let message: String = change.as_ref().map_or_else(
        || format!("{verb} suggestion {}", resolution.suggestion.suggestion_id),
        |change| {
            format!(
                "{verb} suggestion {}: {}",
                resolution.suggestion.suggestion_id, change.message
            )
        },
    );
    SuggestionResponse {
        suggestion: SuggestionInfo::from(&resolution.suggestion),
        change,
        message,
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Returns every audit event recorded against one subject, oldest first.
///
/// # Errors
///
/// Returns an error if the subject kind is unknown or the subject does not
/// belong to the caller's organization.
pub fn get_audit_history(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &AuditHistoryRequest,
) -> Result<AuditHistoryResponse, ApiError> {
    let kind: SubjectKind = SubjectKind::parse(request.subject_kind.trim())
        .ok_or_else(|| RequestError::UnknownSubjectKind(request.subject_kind.clone()))?;
    let subject: AuditSubject = AuditSubject::new(kind, request.subject_id);

    let events: Vec<AuditEvent> =
        fieldsched::audit_history(persistence, ctx.organization_id, &subject)
            .map_err(translate_core_error)?;

    Ok(AuditHistoryResponse {
        subject: subject.to_string(),
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}
