// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::BTreeMap;

use bms_interop_persistence::fixtures::LegacyFixture;

use crate::{BmsDalDatabase, DalSession, PASSWORD_PARAM, SessionExpiryOption};

pub fn create_test_fixture() -> LegacyFixture {
    LegacyFixture::new().expect("Failed to create legacy fixture")
}

/// An adapter over both fixture databases. Connections are not opened.
pub fn create_test_database(fixture: &LegacyFixture) -> BmsDalDatabase {
    BmsDalDatabase::builder(fixture.central_parameters())
        .local(fixture.local_parameters())
        .build()
        .expect("Failed to build adapter")
}

pub fn password_params(password: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(PASSWORD_PARAM.to_string(), password.to_string())])
}

pub fn create_test_session(session_id: &str) -> DalSession {
    DalSession::new(session_id, "group-1")
}

/// Logs ALICE (a system administrator) into a new session.
pub fn login_admin(database: &BmsDalDatabase, session_id: &str) -> DalSession {
    database
        .do_login(
            session_id,
            "alice",
            SessionExpiryOption::default(),
            &password_params("secret"),
        )
        .expect("ALICE should log in");
    create_test_session(session_id)
}
