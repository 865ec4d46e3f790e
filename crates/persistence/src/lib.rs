// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the field-service scheduling engine.
//!
//! This crate stores clients, locations, subscriptions, jobs, routes,
//! optimization suggestions and audit events in `SQLite` through Diesel, and
//! implements the engine's [`JobStore`](fieldsched::JobStore) seam.
//!
//! ## Uniqueness
//!
//! The two engine-wide uniqueness rules are enforced by the schema, not by
//! read-then-write checks:
//!
//! - `idx_jobs_live_slot`: a partial unique index on
//!   `jobs(subscription_id, scheduled_date)` covering every non-canceled job
//! - `idx_routes_technician_date`: a unique index on
//!   `routes(assigned_to, route_date)`
//!
//! Violations surface as `StoreError::Conflict`, which the engine treats as
//! "already exists".
//!
//! ## Storage Format
//!
//! - Dates are `YYYY-MM-DD` text
//! - Enumerations are stored by name (`Scheduled`, `PastDue`, ...)
//! - Audit actor, cause, action and snapshots are `serde_json` documents
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests never observe each other's rows.

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

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod job_store;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

use diesel::SqliteConnection;
use fieldsched_domain::{Client, Location};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub use error::PersistenceError;

/// Global counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter backed by a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via an atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Clients & Locations
    // ========================================================================

    /// Creates an active client in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_client(
        &mut self,
        organization_id: i64,
        name: &str,
    ) -> Result<Client, PersistenceError> {
        mutations::clients::create_client(&mut self.conn, organization_id, name)
    }

    /// Creates a service location for a client.
    ///
    /// The location is stored in the client's organization.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the client does not exist.
    pub fn create_location(
        &mut self,
        client_id: i64,
        label: &str,
    ) -> Result<Location, PersistenceError> {
        let client: Client = queries::clients::get_client(&mut self.conn, client_id)?;
        mutations::clients::create_location(
            &mut self.conn,
            client.organization_id,
            client_id,
            label,
        )
    }
}
