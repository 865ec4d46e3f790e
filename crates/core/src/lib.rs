// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Recurring service scheduling and route assignment engine.
//!
//! The engine turns subscriptions into dated jobs, keeps those jobs
//! consistent as subscriptions change, and binds jobs to technician routes.
//! All storage goes through the [`JobStore`] trait.

mod config;
mod detector;
mod error;
mod lifecycle;
mod materializer;
mod queries;
mod routing;
mod state;
mod store;
mod suggestions;
mod voider;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use config::{DEFAULT_LOOK_AHEAD_DAYS, DEFAULT_TRIGGER, EngineConfig, RequestContext};
pub use detector::{AttentionItem, AttentionReason, detect_unassigned_work};
pub use error::CoreError;
pub use lifecycle::{
    LifecycleOutcome, SchedulePlan, SubscriptionChange, apply_billing_event, create_subscription,
    plan_transition, regenerate_jobs, update_subscription,
};
pub use materializer::{MaterializeOutcome, materialization_window, materialize};
pub use queries::{audit_history, get_subscription, list_subscription_jobs};
pub use routing::{
    AssignOutcome, AssignScope, AssignmentResult, JobAssignment, ResolvedRoute,
    assign_future_jobs, assign_job, assign_job_to_route, assign_subscription_jobs,
    find_or_create_route, route_display_name,
};
pub use state::{job_snapshot, schedule_state_text, subscription_snapshot, suggestion_snapshot};
pub use store::{JobStore, StoreError};
pub use suggestions::{
    SuggestionResolution, accept_suggestion, dismiss_suggestion, record_suggestion,
};
pub use voider::{
    VOID_REASON_CANCELED, VOID_REASON_PAUSED, VOID_REASON_SCHEDULE_CHANGED, VoidOutcome,
    void_future_jobs,
};
