// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job queries.
//!
//! Dates are stored as `YYYY-MM-DD` text, so lexical comparison on
//! `scheduled_date` is calendar order.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{Job, JobStatus, format_iso_date};
use time::Date;

use crate::data_models::JobRow;
use crate::diesel_schema::jobs;
use crate::error::PersistenceError;

/// Retrieves a job by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the job does not exist.
pub fn get_job(conn: &mut SqliteConnection, job_id: i64) -> Result<Job, PersistenceError> {
    jobs::table
        .filter(jobs::job_id.eq(job_id))
        .select(JobRow::as_select())
        .first::<JobRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("job {job_id}")))?
        .into_domain()
}

/// Returns the non-canceled job holding `(subscription_id, date)`, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_live_job(
    conn: &mut SqliteConnection,
    subscription_id: i64,
    date: Date,
) -> Result<Option<Job>, PersistenceError> {
    jobs::table
        .filter(jobs::subscription_id.eq(subscription_id))
        .filter(jobs::scheduled_date.eq(format_iso_date(date)))
        .filter(jobs::status.ne(JobStatus::Canceled.as_str()))
        .select(JobRow::as_select())
        .first::<JobRow>(conn)
        .optional()?
        .map(JobRow::into_domain)
        .transpose()
}

/// Lists a subscription's jobs ordered by date and then ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_jobs_for_subscription(
    conn: &mut SqliteConnection,
    subscription_id: i64,
    from: Option<Date>,
) -> Result<Vec<Job>, PersistenceError> {
    let mut query = jobs::table
        .filter(jobs::subscription_id.eq(subscription_id))
        .select(JobRow::as_select())
        .into_boxed();

    if let Some(from) = from {
        query = query.filter(jobs::scheduled_date.ge(format_iso_date(from)));
    }

    query
        .order((jobs::scheduled_date.asc(), jobs::job_id.asc()))
        .load::<JobRow>(conn)?
        .into_iter()
        .map(JobRow::into_domain)
        .collect()
}

/// Counts the jobs attached to a route.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_route_stops(
    conn: &mut SqliteConnection,
    route_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(jobs::table
        .filter(jobs::route_id.eq(route_id))
        .count()
        .get_result(conn)?)
}
