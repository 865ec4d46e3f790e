// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::StoreError;
use fieldsched_domain::DomainError;

/// Errors that can occur while running engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The entity does not exist or belongs to another organization.
    NotFound {
        /// The kind of entity (e.g., "subscription").
        entity: &'static str,
        /// The requested identifier.
        id: i64,
    },
    /// The entity has already been resolved and cannot be processed again.
    AlreadyProcessed {
        /// The kind of entity (e.g., "suggestion").
        entity: &'static str,
        /// The entity identifier.
        id: i64,
        /// The status the entity is already in.
        status: String,
    },
    /// A storage operation failed part way through.
    Storage {
        /// Description of the operation that failed.
        operation: String,
        /// How many units of work completed before the failure.
        completed: usize,
        /// The underlying store error.
        source: StoreError,
    },
}

impl CoreError {
    /// Builds a storage error for the named operation.
    #[must_use]
    pub fn storage(operation: &str, completed: usize, source: StoreError) -> Self {
        Self::Storage {
            operation: operation.to_string(),
            completed,
            source,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::AlreadyProcessed { entity, id, status } => {
                write!(f, "{entity} {id} already processed (status: {status})")
            }
            Self::Storage {
                operation,
                completed,
                source,
            } => write!(
                f,
                "Storage failure while {operation} after {completed} completed: {source}"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
