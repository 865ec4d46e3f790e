// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{ORG, create_test_persistence, create_test_subscription, seed_client};
use crate::{Persistence, PersistenceError};
use fieldsched::{JobStore, StoreError};
use fieldsched_domain::{Frequency, Location};
use time::macros::date;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());

    let (client, location) = seed_client(&mut persistence);
    let dangling: Location = Location {
        location_id: 999,
        ..location
    };
    let result = persistence.insert_subscription(&create_test_subscription(
        &client,
        &dangling,
        Frequency::Weekly,
        None,
        date!(2024 - 03 - 01),
    ));
    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    db1.create_client(ORG, "Only in db1").unwrap();

    assert_eq!(db1.list_clients(ORG).unwrap().len(), 1);
    assert!(db2.list_clients(ORG).unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!("fieldsched_test_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_client(ORG, "Durable").unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let clients = reopened.list_clients(ORG).unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Durable");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
