// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route find-or-create and job binding.
//!
//! This is the only module that creates route rows. Everything else refers
//! to routes by id.

use crate::config::RequestContext;
use crate::error::CoreError;
use crate::state::job_snapshot;
use crate::store::{JobStore, StoreError, require_job, require_subscription};
use fieldsched_audit::{Action, AuditEvent, AuditSubject, StateSnapshot};
use fieldsched_domain::{DomainError, Job, JobStatus, NewRoute, Route, Subscription, weekday_name};
use time::Date;
use tracing::{debug, info, warn};

/// A route resolved by [`find_or_create_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: Route,
    /// Whether this call inserted the route.
    pub created: bool,
}

/// Result of binding one job to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAssignment {
    pub job_id: i64,
    pub technician_id: i64,
    pub route_id: i64,
    pub route_order: i32,
    pub route_created: bool,
    /// `false` when the job was already on this route.
    pub changed: bool,
}

/// Which of a subscription's future jobs a bulk assignment touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignScope {
    /// Only jobs with no route.
    UnassignedOnly,
    /// Every scheduled job not already on the technician's route.
    AllLive,
}

/// Result of a bulk assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignOutcome {
    /// Identifiers of jobs whose route changed.
    pub assigned: Vec<i64>,
    /// Distinct routes the jobs landed on, in first-use order.
    pub routes: Vec<i64>,
    /// How many of those routes were created by this call.
    pub routes_created: usize,
}

impl AssignOutcome {
    #[must_use]
    pub const fn count(&self) -> usize {
        self.assigned.len()
    }

    fn record(&mut self, assignment: &JobAssignment) {
        if !assignment.changed {
            return;
        }
        self.assigned.push(assignment.job_id);
        if !self.routes.contains(&assignment.route_id) {
            self.routes.push(assignment.route_id);
        }
        if assignment.route_created {
            self.routes_created += 1;
        }
    }
}

/// Result of an audited staff assignment command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult<T> {
    pub outcome: T,
    /// `None` when nothing changed and no audit event was written.
    pub audit_event_id: Option<i64>,
}

/// Display name for a technician's route.
#[must_use]
pub fn route_display_name(technician_id: i64, date: Date) -> String {
    format!(
        "Route for technician {technician_id} on {}, {date}",
        weekday_name(date.weekday())
    )
}

/// Returns the technician's route for `date`, creating a `Planned` one if
/// none exists.
///
/// Creation relies on the store's uniqueness rule: if a concurrent caller
/// wins the insert, its route is re-read and returned.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn find_or_create_route<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    technician_id: i64,
    date: Date,
) -> Result<ResolvedRoute, CoreError> {
    if let Some(route) = store
        .find_route(organization_id, technician_id, date)
        .map_err(|e| CoreError::storage("finding route", 0, e))?
    {
        debug!(route_id = route.route_id, technician_id, route_date = %date, "Reusing route");
        return Ok(ResolvedRoute {
            route,
            created: false,
        });
    }

    let new_route: NewRoute = NewRoute {
        organization_id,
        assigned_to: technician_id,
        route_date: date,
        name: route_display_name(technician_id, date),
    };

    match store.insert_route(&new_route) {
        Ok(route) => {
            info!(route_id = route.route_id, technician_id, route_date = %date, "Created route");
            Ok(ResolvedRoute {
                route,
                created: true,
            })
        }
        Err(StoreError::Conflict(msg)) => {
            warn!(technician_id, route_date = %date, "Route created concurrently; re-reading");
            let route: Route = store
                .find_route(organization_id, technician_id, date)
                .map_err(|e| CoreError::storage("re-reading route", 0, e))?
                .ok_or_else(|| CoreError::storage("re-reading route", 0, StoreError::Conflict(msg)))?;
            Ok(ResolvedRoute {
                route,
                created: false,
            })
        }
        Err(e) => Err(CoreError::storage("creating route", 0, e)),
    }
}

/// Binds a job to the technician's route for `date`.
///
/// The job is appended after the route's current stops. Binding a job that
/// is already on that route changes nothing.
///
/// # Errors
///
/// Returns an error if:
/// - The job does not exist in the organization
/// - The job is not `Scheduled` or `EnRoute`
/// - `date` is not the job's scheduled date
/// - The store fails
pub fn assign_job_to_route<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    job_id: i64,
    technician_id: i64,
    date: Date,
) -> Result<JobAssignment, CoreError> {
    let job: Job = require_job(store, organization_id, job_id)?;
    bind_job(store, organization_id, &job, technician_id, date)
}

fn bind_job<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    job: &Job,
    technician_id: i64,
    date: Date,
) -> Result<JobAssignment, CoreError> {
    if !job.status.is_assignable() {
        return Err(DomainError::JobNotAssignable {
            job_id: job.job_id,
            status: job.status,
        }
        .into());
    }
    if job.scheduled_date != date {
        return Err(DomainError::RouteDateMismatch {
            job_id: job.job_id,
            scheduled_date: job.scheduled_date,
            route_date: date,
        }
        .into());
    }

    let resolved: ResolvedRoute = find_or_create_route(store, organization_id, technician_id, date)?;
    let route_id: i64 = resolved.route.route_id;

    if job.route_id == Some(route_id) && job.assigned_to == Some(technician_id) {
        return Ok(JobAssignment {
            job_id: job.job_id,
            technician_id,
            route_id,
            route_order: job.route_order.unwrap_or_default(),
            route_created: resolved.created,
            changed: false,
        });
    }

    let stops: i64 = store
        .count_route_stops(route_id)
        .map_err(|e| CoreError::storage("counting route stops", 0, e))?;
    let route_order: i32 = i32::try_from(stops.saturating_add(1)).map_err(|_| {
        CoreError::storage(
            "computing route order",
            0,
            StoreError::Backend(format!("route {route_id} has too many stops")),
        )
    })?;

    store
        .attach_job_to_route(job.job_id, technician_id, route_id, route_order)
        .map_err(|e| CoreError::storage("attaching job to route", 0, e))?;

    info!(
        job_id = job.job_id,
        technician_id,
        route_id,
        route_order,
        "Assigned job to route"
    );

    Ok(JobAssignment {
        job_id: job.job_id,
        technician_id,
        route_id,
        route_order,
        route_created: resolved.created,
        changed: true,
    })
}

/// Binds a subscription's scheduled jobs dated on or after `today` to the
/// technician's routes.
///
/// # Errors
///
/// Returns an error on the first failure. A storage failure's `completed`
/// count reports how many jobs were already assigned.
pub fn assign_future_jobs<S: JobStore + ?Sized>(
    store: &mut S,
    subscription: &Subscription,
    technician_id: i64,
    today: Date,
    scope: AssignScope,
) -> Result<AssignOutcome, CoreError> {
    let jobs: Vec<Job> = store
        .list_jobs_for_subscription(subscription.subscription_id, Some(today))
        .map_err(|e| CoreError::storage("listing future jobs", 0, e))?;

    let mut outcome: AssignOutcome = AssignOutcome::default();

    for job in jobs.iter().filter(|job| job.status == JobStatus::Scheduled) {
        let selected: bool = match scope {
            AssignScope::UnassignedOnly => job.route_id.is_none(),
            AssignScope::AllLive => true,
        };
        if !selected {
            continue;
        }

        match bind_job(
            store,
            subscription.organization_id,
            job,
            technician_id,
            job.scheduled_date,
        ) {
            Ok(assignment) => outcome.record(&assignment),
            Err(CoreError::Storage {
                operation, source, ..
            }) => {
                return Err(CoreError::Storage {
                    operation,
                    completed: outcome.count(),
                    source,
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        subscription_id = subscription.subscription_id,
        technician_id,
        assigned = outcome.count(),
        routes = outcome.routes.len(),
        "Assigned future jobs"
    );

    Ok(outcome)
}

/// Staff command: assign one job to a technician's route, with an audit
/// record.
///
/// # Errors
///
/// Returns an error if the assignment is rejected or the store fails.
pub fn assign_job<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    job_id: i64,
    technician_id: i64,
    date: Date,
) -> Result<AssignmentResult<JobAssignment>, CoreError> {
    let before: Job = require_job(store, ctx.organization_id, job_id)?;
    let assignment: JobAssignment =
        bind_job(store, ctx.organization_id, &before, technician_id, date)?;

    if !assignment.changed {
        return Ok(AssignmentResult {
            outcome: assignment,
            audit_event_id: None,
        });
    }

    let mut after: Job = before.clone();
    after.assigned_to = Some(technician_id);
    after.route_id = Some(assignment.route_id);
    after.route_order = Some(assignment.route_order);

    let event: AuditEvent = AuditEvent::new(
        ctx.organization_id,
        AuditSubject::job(job_id),
        ctx.actor.clone(),
        ctx.cause.clone(),
        Action::new(
            String::from("AssignJob"),
            Some(format!(
                "job {job_id} assigned to technician {technician_id} on route {} (stop {})",
                assignment.route_id, assignment.route_order
            )),
        ),
        job_snapshot(&before),
        job_snapshot(&after),
    );
    let audit_event_id: i64 = store
        .record_audit_event(&event)
        .map_err(|e| CoreError::storage("recording audit event", 1, e))?;

    Ok(AssignmentResult {
        outcome: assignment,
        audit_event_id: Some(audit_event_id),
    })
}

/// Staff command: assign every future unassigned job of a subscription to a
/// technician, with an audit record.
///
/// # Errors
///
/// Returns an error if the subscription is unknown or the store fails.
pub fn assign_subscription_jobs<S: JobStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    subscription_id: i64,
    technician_id: i64,
) -> Result<AssignmentResult<AssignOutcome>, CoreError> {
    let subscription: Subscription =
        require_subscription(store, ctx.organization_id, subscription_id)?;
    let outcome: AssignOutcome = assign_future_jobs(
        store,
        &subscription,
        technician_id,
        ctx.today,
        AssignScope::UnassignedOnly,
    )?;

    if outcome.assigned.is_empty() {
        return Ok(AssignmentResult {
            outcome,
            audit_event_id: None,
        });
    }

    let event: AuditEvent = AuditEvent::new(
        ctx.organization_id,
        AuditSubject::subscription(subscription_id),
        ctx.actor.clone(),
        ctx.cause.clone(),
        Action::new(
            String::from("AssignSubscriptionJobs"),
            Some(format!(
                "{} jobs assigned to technician {technician_id} across {} routes",
                outcome.count(),
                outcome.routes.len()
            )),
        ),
        StateSnapshot::new(format!("unassigned_jobs={}", outcome.count())),
        StateSnapshot::new(String::from("unassigned_jobs=0")),
    );
    let audit_event_id: i64 = store
        .record_audit_event(&event)
        .map_err(|e| CoreError::storage("recording audit event", outcome.count(), e))?;

    Ok(AssignmentResult {
        outcome,
        audit_event_id: Some(audit_event_id),
    })
}
