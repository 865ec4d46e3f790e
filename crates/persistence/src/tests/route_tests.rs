// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{ORG, create_test_persistence};
use crate::Persistence;
use fieldsched::{JobStore, StoreError};
use fieldsched_domain::{NewRoute, Route, RouteStatus};
use time::Date;
use time::macros::date;

fn create_test_route(technician_id: i64, route_date: Date) -> NewRoute {
    NewRoute {
        organization_id: ORG,
        assigned_to: technician_id,
        route_date,
        name: format!("Route {technician_id} {route_date}"),
    }
}

#[test]
fn test_new_route_is_planned() {
    let mut persistence: Persistence = create_test_persistence();
    let route: Route = persistence
        .insert_route(&create_test_route(7, date!(2024 - 03 - 05)))
        .unwrap();

    assert_eq!(route.status, RouteStatus::Planned);
    assert_eq!(route.assigned_to, 7);
    assert_eq!(route.route_date, date!(2024 - 03 - 05));
    assert_eq!(persistence.get_route(route.route_id).unwrap(), route);
}

#[test]
fn test_one_route_per_technician_per_date() {
    let mut persistence: Persistence = create_test_persistence();
    let first: Route = persistence
        .insert_route(&create_test_route(7, date!(2024 - 03 - 05)))
        .unwrap();

    let duplicate: Result<Route, StoreError> =
        persistence.insert_route(&create_test_route(7, date!(2024 - 03 - 05)));
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    let found: Route = persistence
        .find_route(ORG, 7, date!(2024 - 03 - 05))
        .unwrap()
        .unwrap();
    assert_eq!(found.route_id, first.route_id);
}

#[test]
fn test_routes_are_keyed_by_technician_and_date() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .insert_route(&create_test_route(7, date!(2024 - 03 - 05)))
        .unwrap();
    persistence
        .insert_route(&create_test_route(8, date!(2024 - 03 - 05)))
        .unwrap();
    persistence
        .insert_route(&create_test_route(7, date!(2024 - 03 - 06)))
        .unwrap();

    assert!(
        persistence
            .find_route(ORG, 9, date!(2024 - 03 - 05))
            .unwrap()
            .is_none()
    );
    assert_eq!(
        persistence
            .find_route(ORG, 8, date!(2024 - 03 - 05))
            .unwrap()
            .map(|route| route.assigned_to),
        Some(8)
    );
}

#[test]
fn test_route_key_is_scoped_to_organization() {
    let mut persistence: Persistence = create_test_persistence();
    let ours: Route = persistence
        .insert_route(&create_test_route(7, date!(2024 - 03 - 05)))
        .unwrap();
    let theirs: Route = persistence
        .insert_route(&NewRoute {
            organization_id: ORG + 1,
            ..create_test_route(7, date!(2024 - 03 - 05))
        })
        .unwrap();

    assert_ne!(ours.route_id, theirs.route_id);
    assert_eq!(
        persistence
            .find_route(ORG + 1, 7, date!(2024 - 03 - 05))
            .unwrap()
            .map(|route| route.route_id),
        Some(theirs.route_id)
    );
    assert_eq!(
        persistence
            .find_route(ORG, 7, date!(2024 - 03 - 05))
            .unwrap()
            .map(|route| route.route_id),
        Some(ours.route_id)
    );
}
