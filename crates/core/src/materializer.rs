// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::store::{JobStore, StoreError};
use fieldsched_domain::{DomainError, Job, NewJob, Subscription, service_days_between};
use time::{Date, Duration};
use tracing::{debug, info, warn};

/// Result of one materialization pass.
///
/// A pass is best effort: a date that fails is recorded and skipped, and
/// the remaining dates are still attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeOutcome {
    /// Jobs inserted by this pass.
    pub created: Vec<Job>,
    /// Service days that already had a live job.
    pub already_present: usize,
    /// Service days whose lookup or insert failed.
    pub failed_dates: Vec<Date>,
}

impl MaterializeOutcome {
    #[must_use]
    pub const fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Returns whether every service day in the window now has a live job.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed_dates.is_empty()
    }
}

/// Returns the inclusive window `(tomorrow, today + look_ahead_days)`.
///
/// # Errors
///
/// Returns an error if the window end cannot be represented.
pub fn materialization_window(today: Date, look_ahead_days: u32) -> Result<(Date, Date), DomainError> {
    let first: Date = today
        .next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing the day after {today}"),
        })?;
    let last: Date = today
        .checked_add(Duration::days(i64::from(look_ahead_days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {look_ahead_days} days to {today}"),
        })?;
    Ok((first, last))
}

/// Creates the jobs a subscription owes within the look-ahead window.
///
/// Dates run from tomorrow through `today + look_ahead_days`. A date that
/// already holds a live job is skipped, so calling this repeatedly yields
/// the same job set. Subscriptions that are not `Active` and one-time
/// subscriptions produce nothing.
///
/// # Arguments
///
/// * `store` - The job store
/// * `config` - Engine configuration (window length and provenance prefix)
/// * `subscription` - The subscription to materialize
/// * `today` - The business date
/// * `trigger` - What caused this pass; recorded on each job
///
/// # Errors
///
/// Returns an error only if the window cannot be computed. Per-date storage
/// failures are reported in `MaterializeOutcome::failed_dates`.
pub fn materialize<S: JobStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    subscription: &Subscription,
    today: Date,
    trigger: &str,
) -> Result<MaterializeOutcome, CoreError> {
    let mut outcome: MaterializeOutcome = MaterializeOutcome::default();

    if !subscription.status.generates_jobs() || !subscription.frequency.is_recurring() {
        debug!(
            subscription_id = subscription.subscription_id,
            status = %subscription.status,
            frequency = %subscription.frequency,
            "Subscription does not generate jobs"
        );
        return Ok(outcome);
    }

    let (first, last) = materialization_window(today, config.look_ahead_days)?;
    let generated_by: String = config.provenance(trigger);

    for date in service_days_between(
        first,
        last,
        subscription.frequency,
        subscription.anchor_date,
        subscription.preferred_day,
    ) {
        match store.find_live_job(subscription.subscription_id, date) {
            Ok(Some(existing)) => {
                debug!(
                    subscription_id = subscription.subscription_id,
                    scheduled_date = %date,
                    job_id = existing.job_id,
                    "Live job already present"
                );
                outcome.already_present += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    subscription_id = subscription.subscription_id,
                    scheduled_date = %date,
                    error = %e,
                    "Failed to check for existing job; skipping date"
                );
                outcome.failed_dates.push(date);
                continue;
            }
        }

        let new_job: NewJob = NewJob::for_subscription(subscription, date, &generated_by, today);
        match store.insert_job(&new_job) {
            Ok(job) => {
                debug!(
                    subscription_id = subscription.subscription_id,
                    job_id = job.job_id,
                    scheduled_date = %date,
                    "Created job"
                );
                outcome.created.push(job);
            }
            // Another writer filled the slot between the check and the insert.
            Err(StoreError::Conflict(_)) => outcome.already_present += 1,
            Err(e) => {
                warn!(
                    subscription_id = subscription.subscription_id,
                    scheduled_date = %date,
                    error = %e,
                    "Failed to insert job; skipping date"
                );
                outcome.failed_dates.push(date);
            }
        }
    }

    info!(
        subscription_id = subscription.subscription_id,
        created = outcome.created.len(),
        already_present = outcome.already_present,
        failed = outcome.failed_dates.len(),
        trigger,
        "Materialized jobs"
    );

    Ok(outcome)
}
