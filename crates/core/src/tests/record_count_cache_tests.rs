// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use std::thread;

use bms_interop_domain::EntityKind;

use crate::RecordCountCache;

#[test]
fn test_missing_entry_is_absent() {
    let cache = RecordCountCache::new();
    assert!(cache.get_entry("s1", EntityKind::Genotype, None).is_none());
}

#[test]
fn test_set_then_get_returns_the_count() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    assert!(cache.set_entry("s1", EntityKind::Genotype, None, 1200));

    let entry = cache.get_entry("s1", EntityKind::Genotype, None).unwrap();
    assert_eq!(entry.count, 1200);
    assert_eq!(entry.entity, EntityKind::Genotype);
    assert_eq!(entry.filter_clause, None);
}

#[test]
fn test_entries_are_keyed_by_filter_clause() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    cache.set_entry("s1", EntityKind::GenotypeAlias, None, 10);
    cache.set_entry("s1", EntityKind::GenotypeAlias, Some("nstat = 1"), 4);

    assert_eq!(
        cache
            .get_entry("s1", EntityKind::GenotypeAlias, Some("nstat = 1"))
            .unwrap()
            .count,
        4
    );
    assert_eq!(
        cache
            .get_entry("s1", EntityKind::GenotypeAlias, None)
            .unwrap()
            .count,
        10
    );
    assert!(
        cache
            .get_entry("s1", EntityKind::GenotypeAlias, Some("nstat = 0"))
            .is_none()
    );
}

#[test]
fn test_set_entry_overwrites() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    cache.set_entry("s1", EntityKind::Genus, None, 3);
    cache.set_entry("s1", EntityKind::Genus, None, 5);

    assert_eq!(cache.get_entry("s1", EntityKind::Genus, None).unwrap().count, 5);
}

#[test]
fn test_remove_entries_for_purges_only_that_session() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    cache.open_session("s2");
    cache.set_entry("s1", EntityKind::Genotype, None, 1);
    cache.set_entry("s1", EntityKind::GenotypeAlias, Some("nstat = 1"), 2);
    cache.set_entry("s2", EntityKind::Genotype, None, 3);

    assert_eq!(cache.remove_entries_for("s1"), 2);

    for kind in EntityKind::ALL {
        assert!(cache.get_entry("s1", kind, None).is_none());
    }
    assert!(
        cache
            .get_entry("s1", EntityKind::GenotypeAlias, Some("nstat = 1"))
            .is_none()
    );
    assert_eq!(cache.get_entry("s2", EntityKind::Genotype, None).unwrap().count, 3);
    assert_eq!(cache.session_count(), 1);
}

#[test]
fn test_remove_entries_for_unknown_session_is_harmless() {
    let cache = RecordCountCache::new();
    assert_eq!(cache.remove_entries_for("nobody"), 0);
}

#[test]
fn test_set_entry_for_unopened_session_is_dropped() {
    let cache = RecordCountCache::new();

    assert!(!cache.set_entry("s1", EntityKind::Genotype, None, 7));
    assert!(cache.get_entry("s1", EntityKind::Genotype, None).is_none());
    assert_eq!(cache.session_count(), 0);
}

#[test]
fn test_count_arriving_after_close_is_dropped() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    assert!(cache.is_open("s1"));

    cache.remove_entries_for("s1");

    assert!(!cache.is_open("s1"));
    assert!(!cache.set_entry("s1", EntityKind::Genotype, None, 7));
    assert!(cache.get_entry("s1", EntityKind::Genotype, None).is_none());
}

#[test]
fn test_reopening_a_session_discards_its_entries() {
    let cache = RecordCountCache::new();
    cache.open_session("s1");
    cache.set_entry("s1", EntityKind::Genotype, None, 7);

    cache.open_session("s1");

    assert!(cache.is_open("s1"));
    assert!(cache.get_entry("s1", EntityKind::Genotype, None).is_none());
}

#[test]
fn test_concurrent_access_does_not_lose_sessions() {
    let cache = Arc::new(RecordCountCache::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let session = format!("session-{i}");
                cache.open_session(&session);
                for n in 0..100 {
                    cache.set_entry(&session, EntityKind::Genotype, None, n);
                    let _ = cache.get_entry(&session, EntityKind::Genotype, None);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.session_count(), 8);
    for i in 0..8 {
        let entry = cache
            .get_entry(&format!("session-{i}"), EntityKind::Genotype, None)
            .unwrap();
        assert_eq!(entry.count, 99);
    }
}
