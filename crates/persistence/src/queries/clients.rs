// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{Client, Location};

use crate::data_models::{ClientRow, LocationRow};
use crate::diesel_schema::{clients, locations};
use crate::error::PersistenceError;

/// Retrieves a client by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the client does not exist.
pub fn get_client(conn: &mut SqliteConnection, client_id: i64) -> Result<Client, PersistenceError> {
    let row: ClientRow = clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientRow::as_select())
        .first::<ClientRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("client {client_id}")))?;
    Ok(row.into_domain())
}

/// Lists an organization's clients ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_clients(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<Client>, PersistenceError> {
    let rows: Vec<ClientRow> = clients::table
        .filter(clients::organization_id.eq(organization_id))
        .order(clients::client_id.asc())
        .select(ClientRow::as_select())
        .load::<ClientRow>(conn)?;
    Ok(rows.into_iter().map(ClientRow::into_domain).collect())
}

/// Retrieves a location by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the location does not exist.
pub fn get_location(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<Location, PersistenceError> {
    let row: LocationRow = locations::table
        .filter(locations::location_id.eq(location_id))
        .select(LocationRow::as_select())
        .first::<LocationRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("location {location_id}")))?;
    Ok(row.into_domain())
}

/// Lists an organization's locations ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_locations(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<Location>, PersistenceError> {
    let rows: Vec<LocationRow> = locations::table
        .filter(locations::organization_id.eq(organization_id))
        .order(locations::location_id.asc())
        .select(LocationRow::as_select())
        .load::<LocationRow>(conn)?;
    Ok(rows.into_iter().map(LocationRow::into_domain).collect())
}
