// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::JobStore;
use fieldsched_domain::Job;
use time::Date;
use tracing::{debug, error, info};

/// Reason recorded on jobs voided by a pause.
pub const VOID_REASON_PAUSED: &str = "paused";

/// Reason recorded on jobs voided by a cancellation.
pub const VOID_REASON_CANCELED: &str = "canceled";

/// Reason recorded on jobs voided by a frequency or preferred-day change.
pub const VOID_REASON_SCHEDULE_CHANGED: &str = "schedule changed";

/// Jobs canceled by one voiding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoidOutcome {
    /// Identifiers of the jobs that were canceled.
    pub voided: Vec<i64>,
}

impl VoidOutcome {
    #[must_use]
    pub const fn count(&self) -> usize {
        self.voided.len()
    }
}

/// Cancels a subscription's jobs dated on or after `today` that have not
/// started, detaching each from its route.
///
/// In-progress, completed, skipped and already canceled jobs are left alone.
///
/// # Errors
///
/// Returns `CoreError::Storage` on the first storage failure. Its
/// `completed` count reports how many jobs were already voided.
pub fn void_future_jobs<S: JobStore + ?Sized>(
    store: &mut S,
    subscription_id: i64,
    today: Date,
    reason: &str,
) -> Result<VoidOutcome, CoreError> {
    let jobs: Vec<Job> = store
        .list_jobs_for_subscription(subscription_id, Some(today))
        .map_err(|e| CoreError::storage("listing future jobs", 0, e))?;

    let mut outcome: VoidOutcome = VoidOutcome::default();

    for job in jobs.iter().filter(|job| job.status.is_voidable()) {
        match store.cancel_job(job.job_id, reason) {
            Ok(true) => outcome.voided.push(job.job_id),
            Ok(false) => debug!(
                job_id = job.job_id,
                "Job left a voidable status before it could be canceled"
            ),
            Err(e) => {
                error!(
                    subscription_id,
                    job_id = job.job_id,
                    voided = outcome.voided.len(),
                    error = %e,
                    "Failed to void job"
                );
                return Err(CoreError::storage(
                    &format!("voiding job {}", job.job_id),
                    outcome.voided.len(),
                    e,
                ));
            }
        }
    }

    info!(
        subscription_id,
        voided = outcome.voided.len(),
        reason,
        "Voided future jobs"
    );

    Ok(outcome)
}
