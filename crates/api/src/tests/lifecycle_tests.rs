// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::{Arc, Mutex};
use std::thread;

use bms_interop::{OperationRegistry, OperationShape};
use bms_interop_domain::EntityKind;
use bms_interop_persistence::{ConnectionManager, ConnectionParameters, Progress};

use super::helpers::{create_test_database, create_test_fixture, create_test_session, login_admin};
use crate::{ApiError, BmsDalDatabase, DATABASE_VERSION, Providers, register_operations};

fn unopened_providers() -> Providers {
    let connections = ConnectionManager::new(None, ConnectionParameters::new(":memory:")).unwrap();
    Providers::federated(&Arc::new(connections), None)
}

#[test]
fn test_operations_are_registered_in_order() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let templates: Vec<&str> = database
        .get_operations()
        .iter()
        .map(crate::DalOperation::template)
        .collect();
    assert_eq!(
        templates,
        vec![
            "get/genus/_id",
            "list/genus",
            "get/genotype/_id",
            "list/genotype/_nperpage/page/_num",
            "get/genotypealias/_id",
            "list/genotypealias/_nperpage/page/_num",
            "genotype/_genoid/list/alias",
        ]
    );

    let children = &database.get_operations()[6];
    assert_eq!(children.entity_kind(), EntityKind::GenotypeAlias);
    assert_eq!(
        children.shape(),
        &OperationShape::ListChildren {
            parent: String::from("genotype"),
            parent_param: String::from("genoid"),
            child: String::from("alias"),
        }
    );
}

#[test]
fn test_operations_are_built_once() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let seen = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let address = database.get_operations().as_ptr() as usize;
                seen.lock().unwrap().push(address);
            });
        }
    });

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|address| *address == seen[0]));
    assert_eq!(database.get_operations().as_ptr() as usize, seen[0]);
}

#[test]
fn test_entity_names() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let names: Vec<&str> = database.get_entity_names().into_iter().collect();
    assert_eq!(names, vec!["genotype", "genotypealias", "genus"]);
    assert_eq!(
        database.get_entity_kind("GenotypeAlias"),
        Some(EntityKind::GenotypeAlias)
    );
    assert_eq!(database.get_entity_kind("specimen"), None);
}

#[test]
fn test_duplicate_template_is_a_configuration_error() {
    let providers = unopened_providers();
    let mut registry = OperationRegistry::new().unwrap();
    register_operations(&mut registry, &providers).unwrap();

    let result = register_operations(&mut registry, &providers);
    assert!(matches!(result, Err(ApiError::Configuration(_))));
}

#[test]
fn test_unrecognised_template_is_a_configuration_error() {
    let providers = unopened_providers();
    let mut registry = OperationRegistry::new().unwrap();

    let result = registry
        .register("fetch/genotype", EntityKind::Genotype, providers.genotype)
        .map(|_| ())
        .map_err(ApiError::from);
    assert!(matches!(result, Err(ApiError::Configuration(_))));
}

#[test]
fn test_same_local_and_central_is_rejected() {
    let fixture = create_test_fixture();
    let result = BmsDalDatabase::builder(fixture.central_parameters())
        .local(fixture.central_parameters())
        .build();
    assert!(matches!(result, Err(ApiError::Configuration(_))));
}

#[test]
fn test_initialise_now_opens_connections() {
    let fixture = create_test_fixture();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);

    let database = BmsDalDatabase::builder(fixture.central_parameters())
        .local(fixture.local_parameters())
        .progress(Arc::new(move |message: &str| {
            sink.lock().unwrap().push(message.to_string());
        }))
        .initialise_now(true)
        .build()
        .unwrap();

    assert!(!database.is_initialise_required());
    let messages = messages.lock().unwrap();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("Database connections ready")
    );
}

#[test]
fn test_initialise_is_idempotent() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let calls = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&calls);
    let count = move |_: &str| *counter.lock().unwrap() += 1;
    let progress: &Progress = &count;

    database.initialise(Some(progress)).unwrap();
    let first = *calls.lock().unwrap();
    database.initialise(Some(progress)).unwrap();

    assert!(first > 0);
    assert_eq!(*calls.lock().unwrap(), first);
}

#[test]
fn test_shutdown_forgets_sessions() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let session = login_admin(&database, "s1");
    database.set_record_count_cache_entry(&session, EntityKind::Genotype, None, 3);

    database.shutdown();

    assert!(database.is_initialise_required());
    assert_eq!(database.session_user("s1"), None);
    assert!(
        database
            .get_record_count_cache_entry(&session, EntityKind::Genotype, None)
            .is_none()
    );
    assert_eq!(
        database.get_system_group_info(&session),
        Err(ApiError::NotLoggedIn)
    );

    // Logging in again reopens the connections.
    login_admin(&database, "s2");
    assert!(!database.is_initialise_required());
}

#[test]
fn test_group_listing_after_logout() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let session = login_admin(&database, "s1");

    database.do_logout(&session);
    assert_eq!(
        database.get_system_group_info(&create_test_session("s1")),
        Err(ApiError::NotLoggedIn)
    );
}

#[test]
fn test_database_path_and_version() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    assert_eq!(database.get_database_version(), DATABASE_VERSION);
    assert_eq!(
        database.get_database_path(),
        format!(
            "{}$${}",
            fixture.central_parameters().base_url(),
            fixture.local_parameters().base_url()
        )
    );

    let central_only = BmsDalDatabase::builder(fixture.central_parameters())
        .build()
        .unwrap();
    assert_eq!(
        central_only.get_database_path(),
        format!("{}$$", fixture.central_parameters().base_url())
    );
}
