// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldsched::{CoreError, StoreError};
use fieldsched_domain::DomainError;
use fieldsched_persistence::PersistenceError;
use thiserror::Error;

/// Request-shape errors detected before any engine call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A required text field was blank.
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// The audit subject kind is not recognized.
    #[error("Unknown audit subject kind '{0}'")]
    UnknownSubjectKind(String),

    /// Both a value and its clearing flag were supplied.
    #[error("Field '{field}' cannot be set and cleared in the same request")]
    SetAndClear { field: &'static str },
}

impl RequestError {
    const fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } | Self::SetAndClear { field } => field,
            Self::UnknownSubjectKind(_) => "subject_kind",
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred. The request may be retried.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    let field: &str = match err {
        DomainError::InvalidFrequency(_) => "frequency",
        DomainError::InvalidSubscriptionStatus(_) => "status",
        DomainError::InvalidJobStatus(_) => "job_status",
        DomainError::InvalidRouteStatus(_) => "route_status",
        DomainError::InvalidSuggestionStatus(_) => "suggestion_status",
        DomainError::InvalidSuggestionType(_) => "suggestion_type",
        DomainError::InvalidWeekday(_) => "preferred_day",
        DomainError::InvalidBillingEventKind(_) => "event_type",
        DomainError::InvalidBillingStatus(_) => "processor_status",
        DomainError::InvalidPrice { .. } => "price_cents",
        DomainError::InvalidLookAhead { .. } => "look_ahead_days",
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => "date",
        DomainError::LocationClientMismatch { .. } => "location_id",
        DomainError::JobNotAssignable { .. } => "job_id",
        DomainError::RouteDateMismatch { .. } => "route_date",
        DomainError::EmptySuggestion => "suggested_state",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn capitalize(entity: &str) -> String {
    let mut chars = entity.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Translates a core error into an API error.
///
/// Cross-organization access is reported exactly like a missing record.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(&domain_err),
        CoreError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity),
            message: format!("{entity} {id} does not exist"),
        },
        CoreError::AlreadyProcessed { entity, id, status } => ApiError::Conflict {
            message: format!("{entity} {id} has already been processed ({status})"),
        },
        CoreError::Storage {
            operation,
            completed,
            source: StoreError::Conflict(msg),
        } => ApiError::Conflict {
            message: format!("{operation} conflicted after {completed} completed: {msg}"),
        },
        CoreError::Storage {
            operation,
            completed,
            source,
        } => ApiError::Internal {
            message: format!("{operation} failed after {completed} completed: {source}"),
        },
    }
}

/// Translates a persistence error raised outside the engine (client and
/// location maintenance) into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::UniqueViolation(message) => ApiError::Conflict { message },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
