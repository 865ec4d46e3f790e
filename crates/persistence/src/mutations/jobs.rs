// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job mutations.
//!
//! The live-slot rule is enforced by the `idx_jobs_live_slot` partial unique
//! index; an insert into an occupied slot surfaces as
//! `PersistenceError::UniqueViolation`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{Job, JobStatus, NewJob, format_iso_date};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::jobs;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a `Scheduled` job.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if a live job already holds
/// the `(subscription, date)` slot.
pub fn insert_job(conn: &mut SqliteConnection, new: &NewJob) -> Result<Job, PersistenceError> {
    diesel::insert_into(jobs::table)
        .values((
            jobs::organization_id.eq(new.organization_id),
            jobs::subscription_id.eq(new.subscription_id),
            jobs::client_id.eq(new.client_id),
            jobs::location_id.eq(new.location_id),
            jobs::scheduled_date.eq(format_iso_date(new.scheduled_date)),
            jobs::status.eq(JobStatus::Scheduled.as_str()),
            jobs::price_cents.eq(new.price_cents),
            jobs::generated_by.eq(&new.generated_by),
            jobs::generated_on.eq(format_iso_date(new.generated_on)),
        ))
        .execute(conn)?;

    let job_id: i64 = get_last_insert_rowid(conn)?;
    debug!(job_id, scheduled_date = %new.scheduled_date, "Inserted job");
    queries::jobs::get_job(conn, job_id)
}

/// Cancels a job that is still `Scheduled` or `EnRoute`.
///
/// The status check and the write are one statement, so a job that a
/// technician started in the meantime is left alone.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn cancel_job(
    conn: &mut SqliteConnection,
    job_id: i64,
    reason: &str,
) -> Result<bool, PersistenceError> {
    let voidable: Vec<&str> = vec![JobStatus::Scheduled.as_str(), JobStatus::EnRoute.as_str()];

    let updated: usize = diesel::update(
        jobs::table
            .filter(jobs::job_id.eq(job_id))
            .filter(jobs::status.eq_any(voidable)),
    )
    .set((
        jobs::status.eq(JobStatus::Canceled.as_str()),
        jobs::skip_reason.eq(Some(reason)),
        jobs::route_id.eq(None::<i64>),
        jobs::route_order.eq(None::<i32>),
    ))
    .execute(conn)?;

    if updated == 0 {
        debug!(job_id, "Job no longer voidable");
        return Ok(false);
    }

    info!(job_id, reason, "Canceled job");
    Ok(true)
}

/// Binds a job to a technician's route.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the job does not exist.
pub fn attach_job_to_route(
    conn: &mut SqliteConnection,
    job_id: i64,
    technician_id: i64,
    route_id: i64,
    route_order: i32,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(jobs::table.filter(jobs::job_id.eq(job_id)))
        .set((
            jobs::assigned_to.eq(Some(technician_id)),
            jobs::route_id.eq(Some(route_id)),
            jobs::route_order.eq(Some(route_order)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("job {job_id}")));
    }

    debug!(job_id, route_id, route_order, "Attached job to route");
    Ok(())
}
