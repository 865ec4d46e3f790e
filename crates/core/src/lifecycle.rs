// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription lifecycle controller.
//!
//! Every subscription mutation, whether a staff edit, a payment-processor
//! event, or an accepted suggestion, passes through [`update_subscription`].
//! The controller persists the new subscription first, then runs its side
//! effects in a fixed order:
//!
//! 1. void future jobs
//! 2. materialize the look-ahead window
//! 3. bind jobs to the default technician's routes
//!
//! Voiding always precedes materializing so the `(subscription, date)` slot
//! is free before a replacement job is generated. Side-effect failures are
//! reported as warnings on the outcome; the status change is kept.

use crate::config::{EngineConfig, RequestContext};
use crate::error::CoreError;
use crate::materializer::{MaterializeOutcome, materialize};
use crate::routing::{AssignOutcome, AssignScope, assign_future_jobs};
use crate::state::subscription_snapshot;
use crate::store::{JobStore, require_client, require_location, require_subscription};
use crate::voider::{
    VOID_REASON_CANCELED, VOID_REASON_PAUSED, VOID_REASON_SCHEDULE_CHANGED, VoidOutcome,
    void_future_jobs,
};
use fieldsched_audit::{Action, AuditEvent, AuditSubject, StateSnapshot};
use fieldsched_domain::{
    BillingEventKind, Client, DomainError, Frequency, Location, NewSubscription, Subscription,
    SubscriptionStatus, status_for_billing_event, validate_price,
};
use time::{Date, Weekday};
use tracing::{info, warn};

/// A partial update to a subscription. `None` fields are left unchanged.
///
/// The nested options on `preferred_day` and `assigned_technician_id`
/// distinguish "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionChange {
    pub status: Option<SubscriptionStatus>,
    pub frequency: Option<Frequency>,
    pub preferred_day: Option<Option<Weekday>>,
    pub price_cents: Option<i64>,
    pub initial_cleanup_completed: Option<bool>,
    pub assigned_technician_id: Option<Option<i64>>,
}

impl SubscriptionChange {
    /// A change that only sets the status.
    #[must_use]
    pub fn status(status: SubscriptionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns the subscription with this change applied.
    #[must_use]
    pub fn apply_to(&self, subscription: &Subscription) -> Subscription {
        let mut updated: Subscription = subscription.clone();
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(frequency) = self.frequency {
            updated.frequency = frequency;
        }
        if let Some(preferred_day) = self.preferred_day {
            updated.preferred_day = preferred_day;
        }
        if let Some(price_cents) = self.price_cents {
            updated.price_cents = price_cents;
        }
        if let Some(completed) = self.initial_cleanup_completed {
            updated.initial_cleanup_completed = completed;
        }
        if let Some(technician_id) = self.assigned_technician_id {
            updated.assigned_technician_id = technician_id;
        }
        updated
    }
}

/// The side effects a subscription transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Name of the audit action.
    pub action: &'static str,
    /// Short label used in the audit details (e.g., "paused").
    pub label: &'static str,
    /// Void future jobs with this reason before anything else.
    pub void_reason: Option<&'static str>,
    /// Fill the look-ahead window afterwards.
    pub materialize: bool,
    /// Bind future jobs to the default technician, if one is set.
    pub bind_technician: Option<AssignScope>,
    /// Deactivate the client if it has no other active subscription.
    pub check_client_deactivation: bool,
}

impl SchedulePlan {
    const fn nothing(action: &'static str, label: &'static str) -> Self {
        Self {
            action,
            label,
            void_reason: None,
            materialize: false,
            bind_technician: None,
            check_client_deactivation: false,
        }
    }
}

/// Decides the side effects of moving from `before` to `after`.
///
/// | Transition | Effect |
/// |---|---|
/// | any → `Paused` | void ("paused") |
/// | any → `Canceled` | void ("canceled"), maybe deactivate client |
/// | other → `Active` | materialize |
/// | frequency or preferred day changed while `Active` | void ("schedule changed"), materialize |
/// | frequency or preferred day changed in any other status | void ("schedule changed") |
/// | → `PastDue` / `PendingCancel` | nothing |
/// | price only | nothing |
///
/// A schedule change always voids, so jobs generated under the old rule
/// never survive into a later reactivation.
///
/// When the result is `Active`, materialized jobs are bound to the default
/// technician. A technician change rebinds every scheduled future job.
#[must_use]
pub fn plan_transition(before: &Subscription, after: &Subscription) -> SchedulePlan {
    let status_changed: bool = before.status != after.status;
    let schedule_changed: bool = before.schedule_differs_from(after);
    let technician_changed: bool = before.assigned_technician_id != after.assigned_technician_id;

    let mut plan: SchedulePlan = match after.status {
        SubscriptionStatus::Paused if status_changed => SchedulePlan {
            void_reason: Some(VOID_REASON_PAUSED),
            ..SchedulePlan::nothing("PauseSubscription", "paused")
        },
        SubscriptionStatus::Canceled if status_changed => SchedulePlan {
            void_reason: Some(VOID_REASON_CANCELED),
            check_client_deactivation: true,
            ..SchedulePlan::nothing("CancelSubscription", "canceled")
        },
        SubscriptionStatus::Active if schedule_changed => SchedulePlan {
            void_reason: Some(VOID_REASON_SCHEDULE_CHANGED),
            materialize: true,
            ..SchedulePlan::nothing("ChangeSchedule", "schedule changed")
        },
        SubscriptionStatus::Active if status_changed => SchedulePlan {
            materialize: true,
            ..SchedulePlan::nothing("ActivateSubscription", "activated")
        },
        SubscriptionStatus::PastDue if status_changed => {
            SchedulePlan::nothing("MarkSubscriptionPastDue", "past due")
        }
        SubscriptionStatus::PendingCancel if status_changed => {
            SchedulePlan::nothing("ScheduleSubscriptionCancel", "pending cancel")
        }
        _ if schedule_changed => SchedulePlan::nothing("ChangeSchedule", "schedule changed"),
        _ if technician_changed => {
            SchedulePlan::nothing("ReassignTechnician", "technician reassigned")
        }
        _ => SchedulePlan::nothing("UpdateSubscription", "updated"),
    };

    if schedule_changed && plan.void_reason.is_none() {
        plan.void_reason = Some(VOID_REASON_SCHEDULE_CHANGED);
    }

    if after.status == SubscriptionStatus::Active && after.assigned_technician_id.is_some() {
        if technician_changed {
            plan.bind_technician = Some(AssignScope::AllLive);
            if plan.action == "UpdateSubscription" {
                plan.action = "ReassignTechnician";
                plan.label = "technician reassigned";
            }
        } else if plan.materialize {
            plan.bind_technician = Some(AssignScope::UnassignedOnly);
        }
    }

    plan
}

/// What a lifecycle operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleOutcome {
    /// The subscription as persisted after the operation.
    pub subscription: Subscription,
    pub voided: usize,
    pub generated: usize,
    pub assigned: usize,
    /// Service days the materializer could not fill.
    pub failed_dates: Vec<Date>,
    /// Degraded side effects. Empty when everything succeeded.
    pub warnings: Vec<String>,
    /// Whether the client was marked inactive.
    pub client_deactivated: bool,
    /// `None` when nothing changed and no audit event was written.
    pub audit_event_id: Option<i64>,
}

impl LifecycleOutcome {
    fn unchanged(subscription: Subscription) -> Self {
        Self {
            subscription,
            voided: 0,
            generated: 0,
            assigned: 0,
            failed_dates: Vec::new(),
            warnings: Vec::new(),
            client_deactivated: false,
            audit_event_id: None,
        }
    }

    /// Staff-facing summary, e.g. "11 jobs voided / 0 jobs generated".
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} jobs voided / {} jobs generated",
            self.voided, self.generated
        )
    }

    /// Returns whether any side effect failed.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Default)]
struct Effects {
    voided: usize,
    generated: usize,
    assigned: usize,
    failed_dates: Vec<Date>,
    warnings: Vec<String>,
    client_deactivated: bool,
}

fn run_plan<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    today: Date,
    subscription: &Subscription,
    plan: &SchedulePlan,
) -> Effects {
    let mut effects: Effects = Effects::default();
    let mut void_failed: bool = false;

    if let Some(reason) = plan.void_reason {
        match void_future_jobs(store, subscription.subscription_id, today, reason) {
            Ok(VoidOutcome { voided }) => effects.voided = voided.len(),
            Err(e) => {
                // Materializing now could stack new jobs next to ones that
                // were never voided.
                if let CoreError::Storage { completed, .. } = &e {
                    effects.voided = *completed;
                }
                warn!(
                    subscription_id = subscription.subscription_id,
                    error = %e,
                    "Voiding failed; skipping regeneration"
                );
                effects.warnings.push(format!("voiding failed: {e}"));
                void_failed = true;
            }
        }
    }

    if plan.materialize && !void_failed {
        match materialize(store, config, subscription, today, plan.action) {
            Ok(MaterializeOutcome {
                created,
                failed_dates,
                ..
            }) => {
                effects.generated = created.len();
                if !failed_dates.is_empty() {
                    effects.warnings.push(format!(
                        "{} service days could not be generated; regenerate to retry",
                        failed_dates.len()
                    ));
                }
                effects.failed_dates = failed_dates;
            }
            Err(e) => effects.warnings.push(format!("materialization failed: {e}")),
        }
    }

    let bind_scope: Option<AssignScope> = if void_failed { None } else { plan.bind_technician };
    if let (Some(scope), Some(technician_id)) = (bind_scope, subscription.assigned_technician_id) {
        match assign_future_jobs(store, subscription, technician_id, today, scope) {
            Ok(AssignOutcome { assigned, .. }) => effects.assigned = assigned.len(),
            Err(e) => {
                if let CoreError::Storage { completed, .. } = &e {
                    effects.assigned = *completed;
                }
                warn!(
                    subscription_id = subscription.subscription_id,
                    technician_id,
                    error = %e,
                    "Route assignment failed"
                );
                effects.warnings.push(format!("route assignment failed: {e}"));
            }
        }
    }

    if plan.check_client_deactivation {
        match deactivate_client_if_idle(store, subscription) {
            Ok(deactivated) => effects.client_deactivated = deactivated,
            Err(e) => effects
                .warnings
                .push(format!("client deactivation check failed: {e}")),
        }
    }

    effects
}

/// Marks the subscription's client inactive when none of its other
/// subscriptions is `Active`.
fn deactivate_client_if_idle<S: JobStore + ?Sized>(
    store: &mut S,
    subscription: &Subscription,
) -> Result<bool, CoreError> {
    let others_active: bool = store
        .list_subscriptions_for_client(subscription.client_id)
        .map_err(|e| CoreError::storage("listing client subscriptions", 0, e))?
        .iter()
        .any(|other| {
            other.subscription_id != subscription.subscription_id
                && other.status == SubscriptionStatus::Active
        });
    if others_active {
        return Ok(false);
    }

    let client: Client = require_client(store, subscription.organization_id, subscription.client_id)?;
    if !client.is_active {
        return Ok(false);
    }

    store
        .set_client_active(client.client_id, false)
        .map_err(|e| CoreError::storage("deactivating client", 0, e))?;
    info!(client_id = client.client_id, "Deactivated client with no active subscription");
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
fn record_lifecycle_event<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    subscription_id: i64,
    action: &str,
    label: &str,
    effects: &Effects,
    before: StateSnapshot,
    after: StateSnapshot,
) -> Result<i64, CoreError> {
    let mut details: String = format!(
        "{label}: {} jobs voided / {} jobs generated",
        effects.voided, effects.generated
    );
    if effects.assigned > 0 {
        details.push_str(&format!(", {} jobs routed", effects.assigned));
    }
    if effects.client_deactivated {
        details.push_str(", client deactivated");
    }
    for warning in &effects.warnings {
        details.push_str(&format!("; warning: {warning}"));
    }

    let event: AuditEvent = AuditEvent::new(
        ctx.organization_id,
        AuditSubject::subscription(subscription_id),
        ctx.actor.clone(),
        ctx.cause.clone(),
        Action::new(action.to_string(), Some(details)),
        before,
        after,
    );
    store
        .record_audit_event(&event)
        .map_err(|e| CoreError::storage("recording audit event", 0, e))
}

fn outcome_from(
    subscription: Subscription,
    effects: Effects,
    audit_event_id: i64,
) -> LifecycleOutcome {
    LifecycleOutcome {
        subscription,
        voided: effects.voided,
        generated: effects.generated,
        assigned: effects.assigned,
        failed_dates: effects.failed_dates,
        warnings: effects.warnings,
        client_deactivated: effects.client_deactivated,
        audit_event_id: Some(audit_event_id),
    }
}

/// Applies a change to a subscription and runs the resulting side effects.
///
/// A change that leaves the subscription identical is a no-op: nothing is
/// written and no audit event is recorded.
///
/// # Errors
///
/// Returns an error if:
/// - The subscription does not exist in the caller's organization
/// - The change is invalid (e.g., negative price)
/// - Persisting the subscription or its audit event fails
///
/// Failures of the void, materialize and routing steps do not fail the
/// call; they appear in `LifecycleOutcome::warnings`.
pub fn update_subscription<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    ctx: &RequestContext,
    subscription_id: i64,
    change: &SubscriptionChange,
) -> Result<LifecycleOutcome, CoreError> {
    let before: Subscription = require_subscription(store, ctx.organization_id, subscription_id)?;

    if let Some(price_cents) = change.price_cents {
        validate_price(price_cents)?;
    }

    let after: Subscription = change.apply_to(&before);
    if after == before {
        info!(subscription_id, "Subscription unchanged; nothing to do");
        return Ok(LifecycleOutcome::unchanged(before));
    }

    store
        .update_subscription(&after)
        .map_err(|e| CoreError::storage("updating subscription", 0, e))?;

    let plan: SchedulePlan = plan_transition(&before, &after);
    info!(
        subscription_id,
        action = plan.action,
        from = %before.status,
        to = %after.status,
        "Applying subscription change"
    );

    let effects: Effects = run_plan(store, config, ctx.today, &after, &plan);

    let audit_event_id: i64 = record_lifecycle_event(
        store,
        ctx,
        subscription_id,
        plan.action,
        plan.label,
        &effects,
        subscription_snapshot(&before),
        subscription_snapshot(&after),
    )?;

    Ok(outcome_from(after, effects, audit_event_id))
}

/// Creates a subscription and, when it starts `Active`, materializes its
/// first window and binds it to the default technician.
///
/// The subscription's organization is taken from `ctx`.
///
/// # Errors
///
/// Returns an error if:
/// - The client or location does not exist in the caller's organization
/// - The location belongs to a different client
/// - The price is negative
/// - Persisting the subscription or its audit event fails
pub fn create_subscription<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    ctx: &RequestContext,
    new_subscription: &NewSubscription,
) -> Result<LifecycleOutcome, CoreError> {
    let client: Client = require_client(store, ctx.organization_id, new_subscription.client_id)?;
    let location: Location =
        require_location(store, ctx.organization_id, new_subscription.location_id)?;
    if location.client_id != client.client_id {
        return Err(DomainError::LocationClientMismatch {
            location_id: location.location_id,
            client_id: client.client_id,
        }
        .into());
    }
    validate_price(new_subscription.price_cents)?;

    let mut scoped: NewSubscription = new_subscription.clone();
    scoped.organization_id = ctx.organization_id;

    let subscription: Subscription = store
        .insert_subscription(&scoped)
        .map_err(|e| CoreError::storage("creating subscription", 0, e))?;

    info!(
        subscription_id = subscription.subscription_id,
        client_id = subscription.client_id,
        frequency = %subscription.frequency,
        status = %subscription.status,
        "Created subscription"
    );

    let plan: SchedulePlan = SchedulePlan {
        materialize: true,
        bind_technician: Some(AssignScope::UnassignedOnly),
        ..SchedulePlan::nothing("CreateSubscription", "created")
    };
    let effects: Effects = run_plan(store, config, ctx.today, &subscription, &plan);

    let audit_event_id: i64 = record_lifecycle_event(
        store,
        ctx,
        subscription.subscription_id,
        plan.action,
        plan.label,
        &effects,
        StateSnapshot::absent(),
        subscription_snapshot(&subscription),
    )?;

    Ok(outcome_from(subscription, effects, audit_event_id))
}

/// Applies a payment-processor lifecycle event.
///
/// The event is mapped to a subscription status and applied through
/// [`update_subscription`]. An event that maps to the current status is a
/// no-op, so redelivered events are harmless.
///
/// # Errors
///
/// Returns an error if the event cannot be mapped or the update fails.
pub fn apply_billing_event<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    ctx: &RequestContext,
    subscription_id: i64,
    kind: BillingEventKind,
    processor_status: Option<&str>,
    cancel_at_period_end: bool,
) -> Result<LifecycleOutcome, CoreError> {
    let target: SubscriptionStatus =
        status_for_billing_event(kind, processor_status, cancel_at_period_end)?;
    let current: Subscription = require_subscription(store, ctx.organization_id, subscription_id)?;

    if current.status == target {
        info!(
            subscription_id,
            event = %kind,
            status = %target,
            "Billing event matches current status; ignoring"
        );
        return Ok(LifecycleOutcome::unchanged(current));
    }

    update_subscription(
        store,
        config,
        ctx,
        subscription_id,
        &SubscriptionChange::status(target),
    )
}

/// Re-runs materialization and default-technician routing for a
/// subscription without changing it.
///
/// Safe to call any number of times; used to recover from a degraded
/// lifecycle outcome.
///
/// # Errors
///
/// Returns an error if the subscription is unknown or the audit event
/// cannot be recorded.
pub fn regenerate_jobs<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    ctx: &RequestContext,
    subscription_id: i64,
) -> Result<LifecycleOutcome, CoreError> {
    let subscription: Subscription =
        require_subscription(store, ctx.organization_id, subscription_id)?;

    let plan: SchedulePlan = SchedulePlan {
        materialize: true,
        bind_technician: Some(AssignScope::UnassignedOnly),
        ..SchedulePlan::nothing("RegenerateJobs", "regenerated")
    };
    let effects: Effects = run_plan(store, config, ctx.today, &subscription, &plan);

    let snapshot: StateSnapshot = subscription_snapshot(&subscription);
    let audit_event_id: i64 = record_lifecycle_event(
        store,
        ctx,
        subscription_id,
        plan.action,
        plan.label,
        &effects,
        snapshot.clone(),
        snapshot,
    )?;

    Ok(outcome_from(subscription, effects, audit_event_id))
}
