// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{NewRoute, Route, RouteStatus, format_iso_date};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::routes;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a `Planned` route.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the technician already has
/// a route on that date.
pub fn insert_route(conn: &mut SqliteConnection, new: &NewRoute) -> Result<Route, PersistenceError> {
    diesel::insert_into(routes::table)
        .values((
            routes::organization_id.eq(new.organization_id),
            routes::assigned_to.eq(new.assigned_to),
            routes::route_date.eq(format_iso_date(new.route_date)),
            routes::status.eq(RouteStatus::Planned.as_str()),
            routes::name.eq(&new.name),
        ))
        .execute(conn)?;

    let route_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        route_id,
        technician_id = new.assigned_to,
        route_date = %new.route_date,
        "Created route"
    );
    queries::routes::get_route(conn, route_id)
}
