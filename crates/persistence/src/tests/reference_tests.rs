// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_fixture, create_manager};
use crate::fixtures::{ADMIN_USER_TYPE, BREEDER_USER_TYPE, GENUS_NAME_TYPE, GENUS_NAMES};
use crate::reference::GenusStore;

#[test]
fn test_genus_store_dedupes_ignoring_case() {
    let store = GenusStore::from_names(["Triticum", "hordeum", "triticum", "Avena", " "]);

    assert_eq!(store.len(), 3);
    let names: Vec<&str> = store.values().iter().map(|g| g.genus_name.as_str()).collect();
    assert_eq!(names, vec!["Avena", "hordeum", "Triticum"]);
}

#[test]
fn test_genus_ids_are_sequential_from_one() {
    let store = GenusStore::from_names(["Zea", "Avena"]);

    assert_eq!(store.id_for("avena"), Some(1));
    assert_eq!(store.id_for("ZEA"), Some(2));
    assert_eq!(store.id_for("Oryza"), None);
    assert_eq!(store.get(2).map(|g| g.genus_name.as_str()), Some("Zea"));
    assert!(store.get(0).is_none());
    assert!(store.get(3).is_none());
    assert!(store.get(-1).is_none());
}

#[test]
fn test_empty_store() {
    let store = GenusStore::from_names(Vec::<String>::new());
    assert!(store.is_empty());
    assert!(store.values().is_empty());
}

#[test]
fn test_reference_data_loaded_from_fixture() {
    let fixture = create_fixture();
    let manager = create_manager(&fixture);
    let connections = manager.current().unwrap();
    let reference = connections.reference();

    assert_eq!(reference.genus_name_type, GENUS_NAME_TYPE);
    assert_eq!(reference.user_types.len(), 2);

    let admin = reference.user_type(ADMIN_USER_TYPE).unwrap();
    assert_eq!(admin.code, "ADMIN");
    assert!(admin.is_group_owner());

    let breeder = reference.user_type(BREEDER_USER_TYPE).unwrap();
    assert!(!breeder.is_group_owner());

    let genera: Vec<&str> = reference
        .genera
        .values()
        .iter()
        .map(|g| g.genus_name.as_str())
        .collect();
    assert_eq!(genera, GENUS_NAMES);
}
