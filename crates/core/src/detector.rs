// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only classifier producing the staff worklist.

use crate::error::CoreError;
use crate::store::JobStore;
use fieldsched_domain::{Client, Job, JobStatus, Location, Subscription, SubscriptionStatus};
use std::collections::{HashMap, HashSet};
use time::Date;
use tracing::debug;

/// Why an item is on the worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttentionReason {
    /// The initial cleanup visit has not been completed.
    InitialCleanupPending,
    /// Scheduled jobs dated today or later have no route.
    UnroutedJobs {
        count: usize,
        earliest: Date,
    },
    /// An active subscription has no live job at all.
    NoJobs,
    /// An active client's location has no active subscription.
    AwaitingOnboarding,
}

impl AttentionReason {
    /// Short stable code for exports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InitialCleanupPending => "initial_cleanup_pending",
            Self::UnroutedJobs { .. } => "unrouted_jobs",
            Self::NoJobs => "no_jobs",
            Self::AwaitingOnboarding => "awaiting_onboarding",
        }
    }
}

impl std::fmt::Display for AttentionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitialCleanupPending => write!(f, "initial cleanup pending"),
            Self::UnroutedJobs { count, earliest } => {
                write!(f, "{count} scheduled jobs without a route (earliest {earliest})")
            }
            Self::NoJobs => write!(f, "active subscription has no jobs"),
            Self::AwaitingOnboarding => write!(f, "location awaiting onboarding"),
        }
    }
}

/// One worklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionItem {
    pub client_id: i64,
    pub location_id: i64,
    /// `None` for a location with no active subscription.
    pub subscription_id: Option<i64>,
    pub reasons: Vec<AttentionReason>,
}

fn subscription_reasons(subscription: &Subscription, jobs: &[Job], today: Date) -> Vec<AttentionReason> {
    let mut reasons: Vec<AttentionReason> = Vec::new();

    if subscription.cleanup_outstanding() {
        reasons.push(AttentionReason::InitialCleanupPending);
    }

    let unrouted: Vec<Date> = jobs
        .iter()
        .filter(|job| {
            job.status == JobStatus::Scheduled
                && job.scheduled_date >= today
                && job.route_id.is_none()
        })
        .map(|job| job.scheduled_date)
        .collect();
    if let Some(earliest) = unrouted.iter().min() {
        reasons.push(AttentionReason::UnroutedJobs {
            count: unrouted.len(),
            earliest: *earliest,
        });
    }

    if subscription.status == SubscriptionStatus::Active
        && !jobs.iter().any(|job| job.status.is_live())
    {
        reasons.push(AttentionReason::NoJobs);
    }

    reasons
}

/// Lists the subscriptions and locations of an organization that need a
/// human.
///
/// An item is flagged when any of these hold:
/// 1. its initial cleanup is required but not completed
/// 2. it has a scheduled job dated today or later without a route
/// 3. it is an active subscription with no live job
/// 4. it is a location of an active client with no active subscription
///
/// Canceled subscriptions are never flagged. Items are ordered by client,
/// location and subscription.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn detect_unassigned_work<S: JobStore + ?Sized>(
    store: &mut S,
    organization_id: i64,
    today: Date,
) -> Result<Vec<AttentionItem>, CoreError> {
    let clients: HashMap<i64, Client> = store
        .list_clients(organization_id)
        .map_err(|e| CoreError::storage("listing clients", 0, e))?
        .into_iter()
        .map(|client| (client.client_id, client))
        .collect();
    let subscriptions: Vec<Subscription> = store
        .list_subscriptions(organization_id)
        .map_err(|e| CoreError::storage("listing subscriptions", 0, e))?;
    let locations: Vec<Location> = store
        .list_locations(organization_id)
        .map_err(|e| CoreError::storage("listing locations", 0, e))?;

    let mut items: Vec<AttentionItem> = Vec::new();
    let mut served_locations: HashSet<i64> = HashSet::new();

    for subscription in &subscriptions {
        if subscription.status == SubscriptionStatus::Active {
            served_locations.insert(subscription.location_id);
        }
        if subscription.status == SubscriptionStatus::Canceled {
            continue;
        }

        let jobs: Vec<Job> = store
            .list_jobs_for_subscription(subscription.subscription_id, None)
            .map_err(|e| CoreError::storage("listing subscription jobs", items.len(), e))?;

        let reasons: Vec<AttentionReason> = subscription_reasons(subscription, &jobs, today);
        if !reasons.is_empty() {
            items.push(AttentionItem {
                client_id: subscription.client_id,
                location_id: subscription.location_id,
                subscription_id: Some(subscription.subscription_id),
                reasons,
            });
        }
    }

    for location in &locations {
        let client_active: bool = clients
            .get(&location.client_id)
            .is_some_and(|client| client.is_active);
        if client_active && !served_locations.contains(&location.location_id) {
            items.push(AttentionItem {
                client_id: location.client_id,
                location_id: location.location_id,
                subscription_id: None,
                reasons: vec![AttentionReason::AwaitingOnboarding],
            });
        }
    }

    items.sort_by_key(|item| (item.client_id, item.location_id, item.subscription_id));

    debug!(organization_id, items = items.len(), "Detected unassigned work");

    Ok(items)
}
