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

mod billing;
mod business_date;
mod calendar;
mod entities;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use billing::{BillingEventKind, status_for_billing_event};
pub use business_date::{business_date, format_iso_date, parse_iso_date};
pub use calendar::{
    MONTHLY_TOLERANCE_DAYS, days_in_month, is_service_day, matches_anchor_week_parity,
    monthly_service_date, service_days_between,
};

// Re-export public types
pub use entities::{
    Client, Job, Location, NewJob, NewRoute, NewSubscription, NewSuggestion, Route,
    ScheduleState, Subscription, Suggestion,
};
pub use error::DomainError;
pub use types::{
    Frequency, JobStatus, RouteStatus, SubscriptionStatus, SuggestionStatus, SuggestionType,
    parse_weekday, weekday_name,
};
pub use validation::{
    MAX_LOOK_AHEAD_DAYS, MIN_LOOK_AHEAD_DAYS, validate_look_ahead, validate_new_suggestion,
    validate_price,
};
