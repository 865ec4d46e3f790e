// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{Route, format_iso_date};
use time::Date;

use crate::data_models::RouteRow;
use crate::diesel_schema::routes;
use crate::error::PersistenceError;

/// Retrieves a route by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the route does not exist.
pub fn get_route(conn: &mut SqliteConnection, route_id: i64) -> Result<Route, PersistenceError> {
    routes::table
        .filter(routes::route_id.eq(route_id))
        .select(RouteRow::as_select())
        .first::<RouteRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("route {route_id}")))?
        .into_domain()
}

/// Finds a technician's route for a date within an organization.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_route(
    conn: &mut SqliteConnection,
    organization_id: i64,
    technician_id: i64,
    date: Date,
) -> Result<Option<Route>, PersistenceError> {
    routes::table
        .filter(routes::organization_id.eq(organization_id))
        .filter(routes::assigned_to.eq(technician_id))
        .filter(routes::route_date.eq(format_iso_date(date)))
        .select(RouteRow::as_select())
        .first::<RouteRow>(conn)
        .optional()?
        .map(RouteRow::into_domain)
        .transpose()
}
