// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{Client, Location};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{clients, locations};
use crate::error::PersistenceError;
use crate::queries;

/// Creates an active client.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_client(
    conn: &mut SqliteConnection,
    organization_id: i64,
    name: &str,
) -> Result<Client, PersistenceError> {
    diesel::insert_into(clients::table)
        .values((
            clients::organization_id.eq(organization_id),
            clients::name.eq(name),
            clients::is_active.eq(1),
        ))
        .execute(conn)?;

    let client_id: i64 = get_last_insert_rowid(conn)?;
    info!(client_id, organization_id, "Created client");
    queries::clients::get_client(conn, client_id)
}

/// Creates a location for an existing client.
///
/// # Errors
///
/// Returns an error if the client does not exist or the insert fails.
pub fn create_location(
    conn: &mut SqliteConnection,
    organization_id: i64,
    client_id: i64,
    label: &str,
) -> Result<Location, PersistenceError> {
    diesel::insert_into(locations::table)
        .values((
            locations::organization_id.eq(organization_id),
            locations::client_id.eq(client_id),
            locations::label.eq(label),
        ))
        .execute(conn)?;

    let location_id: i64 = get_last_insert_rowid(conn)?;
    info!(location_id, client_id, "Created location");
    queries::clients::get_location(conn, location_id)
}

/// Sets a client's active flag.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the client does not exist.
pub fn set_client_active(
    conn: &mut SqliteConnection,
    client_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(clients::table.filter(clients::client_id.eq(client_id)))
        .set(clients::is_active.eq(i32::from(is_active)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("client {client_id}")));
    }
    Ok(())
}
