// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::JobStatus;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Frequency value is not one of the known frequencies.
    InvalidFrequency(String),
    /// Subscription status value is not recognized.
    InvalidSubscriptionStatus(String),
    /// Job status value is not recognized.
    InvalidJobStatus(String),
    /// Route status value is not recognized.
    InvalidRouteStatus(String),
    /// Suggestion status value is not recognized.
    InvalidSuggestionStatus(String),
    /// Suggestion type value is not recognized.
    InvalidSuggestionType(String),
    /// Weekday value is not recognized.
    InvalidWeekday(String),
    /// Payment-processor event kind is not recognized.
    InvalidBillingEventKind(String),
    /// Payment-processor subscription status cannot be mapped.
    InvalidBillingStatus(String),
    /// Price must not be negative.
    InvalidPrice {
        /// The rejected price in cents.
        cents: i64,
    },
    /// Look-ahead window is outside the supported range.
    InvalidLookAhead {
        /// The rejected window length in days.
        days: u32,
    },
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The location does not belong to the client.
    LocationClientMismatch {
        /// The location identifier.
        location_id: i64,
        /// The client the location was expected to belong to.
        client_id: i64,
    },
    /// The job's status does not allow route assignment.
    JobNotAssignable {
        /// The job identifier.
        job_id: i64,
        /// The job's current status.
        status: JobStatus,
    },
    /// The requested route date differs from the job's scheduled date.
    RouteDateMismatch {
        /// The job identifier.
        job_id: i64,
        /// The job's scheduled date.
        scheduled_date: Date,
        /// The requested route date.
        route_date: Date,
    },
    /// A suggestion targets a subscription but proposes no change.
    EmptySuggestion,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFrequency(value) => write!(f, "Invalid frequency: '{value}'"),
            Self::InvalidSubscriptionStatus(value) => {
                write!(f, "Invalid subscription status: '{value}'")
            }
            Self::InvalidJobStatus(value) => write!(f, "Invalid job status: '{value}'"),
            Self::InvalidRouteStatus(value) => write!(f, "Invalid route status: '{value}'"),
            Self::InvalidSuggestionStatus(value) => {
                write!(f, "Invalid suggestion status: '{value}'")
            }
            Self::InvalidSuggestionType(value) => {
                write!(f, "Invalid suggestion type: '{value}'")
            }
            Self::InvalidWeekday(value) => write!(f, "Invalid weekday: '{value}'"),
            Self::InvalidBillingEventKind(value) => {
                write!(f, "Invalid billing event kind: '{value}'")
            }
            Self::InvalidBillingStatus(value) => {
                write!(f, "Unmappable billing status: '{value}'")
            }
            Self::InvalidPrice { cents } => {
                write!(f, "Invalid price: {cents} cents. Must not be negative")
            }
            Self::InvalidLookAhead { days } => {
                write!(
                    f,
                    "Invalid look-ahead window: {days} days. Must be between 1 and 366"
                )
            }
            Self::InvalidTimezone(name) => write!(f, "Invalid timezone: '{name}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::LocationClientMismatch {
                location_id,
                client_id,
            } => {
                write!(
                    f,
                    "Location {location_id} does not belong to client {client_id}"
                )
            }
            Self::JobNotAssignable { job_id, status } => {
                write!(
                    f,
                    "Job {job_id} cannot be assigned to a route while {status}"
                )
            }
            Self::RouteDateMismatch {
                job_id,
                scheduled_date,
                route_date,
            } => {
                write!(
                    f,
                    "Job {job_id} is scheduled for {scheduled_date}, not {route_date}"
                )
            }
            Self::EmptySuggestion => {
                write!(f, "Suggestion proposes neither a service day nor a technician")
            }
        }
    }
}

impl std::error::Error for DomainError {}
