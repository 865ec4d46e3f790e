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

//! API boundary for the field-service scheduling engine.
//!
//! Requests arrive as serde data transfer objects with enumerations and
//! dates as text. Handlers parse them, call the engine against the `SQLite`
//! store, and translate every engine error into an [`ApiError`]. Domain
//! errors never cross this boundary unchanged.
//!
//! Staff-facing responses carry a `message` such as
//! `"3 jobs voided / 2 jobs generated"` so partial outcomes are visible.

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, RequestError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    accept_suggestion, apply_billing_event, assign_job, assign_subscription_jobs,
    create_client, create_location, create_subscription, dismiss_suggestion, get_audit_history,
    get_subscription, get_worklist, list_jobs, record_suggestion, regenerate_jobs,
    update_subscription,
};
pub use request_response::{
    AssignJobRequest, AssignJobResponse, AssignSubscriptionJobsRequest,
    AssignSubscriptionJobsResponse, AttentionReasonInfo, AuditEventInfo, AuditHistoryRequest,
    AuditHistoryResponse, BillingEventRequest, CreateClientRequest, CreateClientResponse,
    CreateLocationRequest, CreateLocationResponse, CreateSubscriptionRequest, JobInfo,
    ListJobsRequest, ListJobsResponse, RecordSuggestionRequest, RegenerateJobsRequest,
    ResolveSuggestionRequest, SubscriptionChangeResponse, SubscriptionInfo, SuggestionInfo,
    SuggestionResponse, UpdateSubscriptionRequest, WorklistItemInfo, WorklistResponse,
};
