// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization-scoped reads for staff tooling.

use crate::error::CoreError;
use crate::store::{JobStore, require_job, require_subscription, require_suggestion};
use fieldsched_audit::{AuditEvent, AuditSubject, SubjectKind};
use fieldsched_domain::{Job, Subscription};
use time::Date;

/// Lists a subscription's jobs, optionally from a date onward.
///
/// # Errors
///
/// Returns an error if the subscription does not exist in the organization
/// or the store fails.
pub fn list_subscription_jobs<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    subscription_id: i64,
    from: Option<Date>,
) -> Result<Vec<Job>, CoreError> {
    require_subscription(store, organization_id, subscription_id)?;
    store
        .list_jobs_for_subscription(subscription_id, from)
        .map_err(|e| CoreError::storage("listing subscription jobs", 0, e))
}

/// Loads a subscription owned by the organization.
///
/// # Errors
///
/// Returns an error if the subscription does not exist in the organization.
pub fn get_subscription<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    subscription_id: i64,
) -> Result<Subscription, CoreError> {
    require_subscription(store, organization_id, subscription_id)
}

/// Lists the audit history of one entity in insertion order.
///
/// # Errors
///
/// Returns an error if the entity does not exist in the organization or the
/// store fails.
pub fn audit_history<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    subject: &AuditSubject,
) -> Result<Vec<AuditEvent>, CoreError> {
    if let Some(id) = subject.id {
        match subject.kind {
            SubjectKind::Subscription => {
                require_subscription(store, organization_id, id)?;
            }
            SubjectKind::Job => {
                require_job(store, organization_id, id)?;
            }
            SubjectKind::Suggestion => {
                require_suggestion(store, organization_id, id)?;
            }
            SubjectKind::Client | SubjectKind::Route => {}
        }
    }

    let events: Vec<AuditEvent> = store
        .list_audit_events(subject)
        .map_err(|e| CoreError::storage("listing audit events", 0, e))?;
    Ok(events
        .into_iter()
        .filter(|event| event.organization_id == organization_id)
        .collect())
}
