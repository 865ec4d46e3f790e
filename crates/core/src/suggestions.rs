// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Optimization suggestion ledger.
//!
//! Suggestions come from an external advisor. Accepting one applies its
//! day and technician through the lifecycle controller; nothing here writes
//! jobs or routes directly.

use crate::config::{EngineConfig, RequestContext};
use crate::error::CoreError;
use crate::lifecycle::{LifecycleOutcome, SubscriptionChange, update_subscription};
use crate::state::{schedule_state_text, suggestion_snapshot};
use crate::store::{JobStore, require_subscription, require_suggestion};
use fieldsched_audit::{Action, AuditEvent, AuditSubject, StateSnapshot};
use fieldsched_domain::{
    NewSuggestion, ScheduleState, Suggestion, SuggestionStatus, SuggestionType,
    validate_new_suggestion,
};
use tracing::{error, info};

/// Result of resolving a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResolution {
    /// The suggestion after resolution.
    pub suggestion: Suggestion,
    /// The lifecycle change applied on acceptance, if any.
    pub lifecycle: Option<LifecycleOutcome>,
    pub audit_event_id: i64,
}

fn already_processed(suggestion: &Suggestion) -> CoreError {
    CoreError::AlreadyProcessed {
        entity: "suggestion",
        id: suggestion.suggestion_id,
        status: suggestion.status.to_string(),
    }
}

fn record_event<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    suggestion_id: i64,
    action: Action,
    before: StateSnapshot,
    after: StateSnapshot,
) -> Result<i64, CoreError> {
    let event: AuditEvent = AuditEvent::new(
        ctx.organization_id,
        AuditSubject::suggestion(suggestion_id),
        ctx.actor.clone(),
        ctx.cause.clone(),
        action,
        before,
        after,
    );
    store
        .record_audit_event(&event)
        .map_err(|e| CoreError::storage("recording audit event", 0, e))
}

/// Records an advisor suggestion as `Pending`.
///
/// # Errors
///
/// Returns an error if the targeted subscription does not exist in the
/// caller's organization, the suggestion proposes nothing, or the store
/// fails.
pub fn record_suggestion<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    new_suggestion: &NewSuggestion,
) -> Result<Suggestion, CoreError> {
    if let Some(subscription_id) = new_suggestion.subscription_id {
        require_subscription(store, ctx.organization_id, subscription_id)?;
    }
    validate_new_suggestion(new_suggestion)?;

    let mut scoped: NewSuggestion = new_suggestion.clone();
    scoped.organization_id = ctx.organization_id;

    let suggestion: Suggestion = store
        .insert_suggestion(&scoped)
        .map_err(|e| CoreError::storage("recording suggestion", 0, e))?;

    record_event(
        store,
        ctx,
        suggestion.suggestion_id,
        Action::new(
            String::from("RecordSuggestion"),
            Some(format!(
                "{}: {}",
                suggestion.suggestion_type, suggestion.reasoning
            )),
        ),
        StateSnapshot::absent(),
        suggestion_snapshot(&suggestion),
    )?;

    info!(
        suggestion_id = suggestion.suggestion_id,
        suggestion_type = %suggestion.suggestion_type,
        "Recorded suggestion"
    );

    Ok(suggestion)
}

/// Accepts a pending suggestion and applies it.
///
/// The suggestion is claimed first (`Pending` → `Accepted`, conditionally),
/// so a second accept fails with `AlreadyProcessed` and cannot apply the
/// change twice. If applying the change fails, the claim is released.
///
/// # Errors
///
/// Returns an error if:
/// - The suggestion does not exist in the caller's organization
/// - The suggestion is not `Pending`
/// - Applying the change to the subscription fails
pub fn accept_suggestion<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    ctx: &RequestContext,
    suggestion_id: i64,
) -> Result<SuggestionResolution, CoreError> {
    let suggestion: Suggestion = require_suggestion(store, ctx.organization_id, suggestion_id)?;
    if suggestion.status != SuggestionStatus::Pending {
        return Err(already_processed(&suggestion));
    }

    let claimed: bool = store
        .transition_suggestion(
            suggestion_id,
            SuggestionStatus::Pending,
            SuggestionStatus::Accepted,
        )
        .map_err(|e| CoreError::storage("accepting suggestion", 0, e))?;
    if !claimed {
        let current: Suggestion = require_suggestion(store, ctx.organization_id, suggestion_id)?;
        return Err(already_processed(&current));
    }

    let lifecycle: Option<LifecycleOutcome> = match suggestion.subscription_id {
        Some(subscription_id) if suggestion.suggestion_type != SuggestionType::Informational => {
            let suggested: ScheduleState = suggestion.suggested_state;
            let change: SubscriptionChange = SubscriptionChange {
                preferred_day: suggested.preferred_day.map(Some),
                assigned_technician_id: suggested.technician_id.map(Some),
                ..SubscriptionChange::default()
            };
            match update_subscription(store, config, ctx, subscription_id, &change) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    if let Err(release) = store.transition_suggestion(
                        suggestion_id,
                        SuggestionStatus::Accepted,
                        SuggestionStatus::Pending,
                    ) {
                        error!(
                            suggestion_id,
                            error = %release,
                            "Failed to release suggestion after a failed apply"
                        );
                    }
                    return Err(e);
                }
            }
        }
        _ => None,
    };

    let before: StateSnapshot = suggestion_snapshot(&suggestion);
    let mut accepted: Suggestion = suggestion;
    accepted.status = SuggestionStatus::Accepted;

    let details: String = lifecycle.as_ref().map_or_else(
        || String::from("accepted without schedule change"),
        |outcome| {
            format!(
                "applied {}: {}",
                schedule_state_text(&accepted.suggested_state),
                outcome.summary()
            )
        },
    );
    let audit_event_id: i64 = record_event(
        store,
        ctx,
        suggestion_id,
        Action::new(String::from("AcceptSuggestion"), Some(details)),
        before,
        suggestion_snapshot(&accepted),
    )?;

    info!(suggestion_id, "Accepted suggestion");

    Ok(SuggestionResolution {
        suggestion: accepted,
        lifecycle,
        audit_event_id,
    })
}

/// Dismisses a pending suggestion without applying it.
///
/// # Errors
///
/// Returns an error if the suggestion does not exist in the caller's
/// organization or is not `Pending`.
pub fn dismiss_suggestion<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    suggestion_id: i64,
) -> Result<SuggestionResolution, CoreError> {
    let suggestion: Suggestion = require_suggestion(store, ctx.organization_id, suggestion_id)?;
    if suggestion.status != SuggestionStatus::Pending {
        return Err(already_processed(&suggestion));
    }

    let dismissed_now: bool = store
        .transition_suggestion(
            suggestion_id,
            SuggestionStatus::Pending,
            SuggestionStatus::Dismissed,
        )
        .map_err(|e| CoreError::storage("dismissing suggestion", 0, e))?;
    if !dismissed_now {
        let current: Suggestion = require_suggestion(store, ctx.organization_id, suggestion_id)?;
        return Err(already_processed(&current));
    }

    let before: StateSnapshot = suggestion_snapshot(&suggestion);
    let mut dismissed: Suggestion = suggestion;
    dismissed.status = SuggestionStatus::Dismissed;

    let audit_event_id: i64 = record_event(
        store,
        ctx,
        suggestion_id,
        Action::new(String::from("DismissSuggestion"), None),
        before,
        suggestion_snapshot(&dismissed),
    )?;

    info!(suggestion_id, "Dismissed suggestion");

    Ok(SuggestionResolution {
        suggestion: dismissed,
        lifecycle: None,
        audit_event_id,
    })
}
