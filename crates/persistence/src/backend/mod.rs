// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Only connection setup differs between engines. Everything else runs
//! through raw SQL that both `SQLite` and `MySQL` accept, so query code
//! never branches on the backend beyond picking the concrete connection.
//!
//! - `sqlite` — `SQLite` (used by the test suites and small installations)
//! - `mysql` — `MySQL`/`MariaDB` (validated via opt-in tests)

pub mod mysql;
pub mod sqlite;

use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::error::PersistenceError;
use crate::params::{BackendKind, ConnectionParameters};

/// An open connection to either supported engine.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

impl BackendConnection {
    /// Opens a connection for the given parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the database refuses the
    /// connection.
    pub fn establish(params: &ConnectionParameters) -> Result<Self, PersistenceError> {
        let url = params.driver_url()?;
        info!(backend = ?params.backend(), url = %params, "Opening database connection");
        match params.backend() {
            BackendKind::Sqlite => sqlite::establish(&url).map(Self::Sqlite),
            BackendKind::Mysql => mysql::establish(&url).map(Self::Mysql),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Sqlite(_) => BackendKind::Sqlite,
            Self::Mysql(_) => BackendKind::Mysql,
        }
    }

    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Mysql(_) => "mysql",
        }
    }
}

impl std::fmt::Debug for BackendConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BackendConnection")
            .field(&self.backend_name())
            .finish()
    }
}
