// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod connection_tests;
mod reference_tests;

use std::sync::Arc;

use crate::connections::{ConnectionManager, silent_progress};
use crate::fixtures::LegacyFixture;
use crate::iterator::EntityIterator;

pub fn create_fixture() -> LegacyFixture {
    LegacyFixture::new().expect("Failed to create legacy fixture")
}

/// A manager over both fixture databases, already initialised.
pub fn create_manager(fixture: &LegacyFixture) -> Arc<ConnectionManager> {
    let manager = ConnectionManager::new(
        Some(fixture.local_parameters()),
        fixture.central_parameters(),
    )
    .expect("Distinct fixture URLs");
    manager
        .initialise(&silent_progress)
        .expect("Failed to open fixture connections");
    Arc::new(manager)
}

/// A manager over the central fixture database only, already initialised.
pub fn create_central_only_manager(fixture: &LegacyFixture) -> Arc<ConnectionManager> {
    let manager = ConnectionManager::new(None, fixture.central_parameters())
        .expect("Central-only parameters are valid");
    manager
        .initialise(&silent_progress)
        .expect("Failed to open fixture connection");
    Arc::new(manager)
}

pub fn collect_ids(iterator: EntityIterator) -> Vec<i32> {
    iterator
        .map(|entity| entity.expect("Iteration failed").id())
        .collect()
}
