// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::{Arc, Mutex};
use std::thread;

use super::{create_central_only_manager, create_fixture, create_manager};
use crate::connections::{ConnectionManager, ConnectionRole, silent_progress};
use crate::error::PersistenceError;
use crate::fixtures::LegacyFixture;
use crate::params::ConnectionParameters;

#[test]
fn test_same_database_rejected_before_connecting() {
    let params = ConnectionParameters::new("file:never_opened?mode=memory&cache=shared");
    let result = ConnectionManager::new(Some(params.clone()), params);
    assert!(matches!(result, Err(PersistenceError::Configuration(_))));
}

#[test]
fn test_current_before_initialise_fails() {
    let fixture = create_fixture();
    let manager =
        ConnectionManager::new(Some(fixture.local_parameters()), fixture.central_parameters())
            .unwrap();

    assert!(!manager.is_initialised());
    assert_eq!(
        manager.current().map(|_| ()),
        Err(PersistenceError::NotInitialized)
    );
}

#[test]
fn test_initialise_reports_progress() {
    let fixture = create_fixture();
    let manager =
        ConnectionManager::new(Some(fixture.local_parameters()), fixture.central_parameters())
            .unwrap();

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    manager
        .initialise(&move |message: &str| sink.lock().unwrap().push(message.to_string()))
        .unwrap();

    let messages = messages.lock().unwrap().clone();
    assert!(messages.iter().any(|m| m.starts_with("Connecting to local database")));
    assert!(messages.iter().any(|m| m.starts_with("Connecting to central database")));
    assert!(messages.iter().any(|m| m == "Loading user types"));
    assert_eq!(messages.last().map(String::as_str), Some("Database connections ready"));
}

#[test]
fn test_initialise_is_idempotent() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);

    let first = manager.current().unwrap();
    let second = manager.initialise(&silent_progress).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_first_initialise_connects_once() {
    let fixture = create_fixture();
    let manager =
        ConnectionManager::new(Some(fixture.local_parameters()), fixture.central_parameters())
            .unwrap();

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let progress = move |message: &str| sink.lock().unwrap().push(message.to_string());

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| manager.initialise(&progress).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let current = manager.current().unwrap();
    assert!(results.iter().all(|connections| Arc::ptr_eq(connections, &current)));

    let messages = messages.lock().unwrap().clone();
    let count = |prefix: &str| messages.iter().filter(|m| m.starts_with(prefix)).count();
    assert_eq!(count("Connecting to local database"), 1);
    assert_eq!(count("Connecting to central database"), 1);
    assert_eq!(count("Database connections ready"), 1);
}

#[test]
fn test_missing_genus_name_type_fails_initialisation() {
    let mut fixture = LegacyFixture::with_schema().unwrap();
    fixture
        .execute(ConnectionRole::Central, "DELETE FROM udflds WHERE fcode = 'GENUS'")
        .unwrap();
    let manager =
        ConnectionManager::new(Some(fixture.local_parameters()), fixture.central_parameters())
            .unwrap();

    let result = manager.initialise(&silent_progress);
    assert!(matches!(
        result,
        Err(PersistenceError::MissingReferenceData(_))
    ));
    assert!(!manager.is_initialised());
}

#[test]
fn test_unreachable_database_fails_initialisation() {
    let manager = ConnectionManager::new(
        None,
        ConnectionParameters::new("/nonexistent/directory/central.db"),
    )
    .unwrap();

    let result = manager.initialise(&silent_progress);
    assert!(matches!(
        result,
        Err(PersistenceError::DatabaseConnectionFailed(_))
    ));
}

#[test]
fn test_connection_for_routes_by_sign() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);
    let connections = manager.current().unwrap();

    assert_eq!(
        connections.connection_for(-7).map(|c| c.role()),
        Some(ConnectionRole::Local)
    );
    assert_eq!(
        connections.connection_for(7).map(|c| c.role()),
        Some(ConnectionRole::Central)
    );
    assert!(connections.connection_for(0).is_none());
}

#[test]
fn test_negative_ids_unowned_without_local() {
    let fixture = create_fixture();
    let manager = create_central_only_manager(&fixture);
    let connections = manager.current().unwrap();

    assert!(!connections.has_local());
    assert!(connections.connection_for(-1).is_none());
    assert_eq!(connections.all_connections().len(), 1);
}

#[test]
fn test_all_connections_local_first() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);
    let connections = manager.current().unwrap();

    let roles: Vec<ConnectionRole> = connections
        .all_connections()
        .iter()
        .map(|c| c.role())
        .collect();
    assert_eq!(roles, vec![ConnectionRole::Local, ConnectionRole::Central]);
}

#[test]
fn test_shutdown_closes_connections() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);
    let connections = manager.current().unwrap();

    manager.shutdown();

    assert!(!manager.is_initialised());
    assert!(!connections.central().is_open());
    assert_eq!(
        manager.current().map(|_| ()),
        Err(PersistenceError::NotInitialized)
    );

    // A second shutdown is a no-op.
    manager.shutdown();
}

#[test]
fn test_reinitialise_after_shutdown() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);
    manager.shutdown();

    manager.initialise(&silent_progress).unwrap();
    assert!(manager.current().unwrap().central().is_open());
}
