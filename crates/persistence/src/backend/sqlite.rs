// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific connection setup.

use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use tracing::debug;

use crate::error::PersistenceError;

/// Opens a read-only `SQLite` connection.
///
/// `target` is a filesystem path or a `file:` URI.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or configured.
pub fn establish(target: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn = SqliteConnection::establish(target)?;

    // NOTE: PRAGMA is raw SQL (Diesel has no PRAGMA DSL)
    conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA query_only = ON;")?;
    debug!(target, "SQLite connection is read-only");

    Ok(conn)
}
