// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific connection setup.
//!
//! ## Testing
//!
//! `MySQL` tests are marked `#[ignore]` and only run through
//! `cargo xtask test-mariadb`, which provisions a container and exports
//! `DATABASE_URL` before running them.

use diesel::connection::SimpleConnection;
use diesel::{Connection, MysqlConnection};
use tracing::debug;

use crate::error::PersistenceError;

/// Opens a `MySQL` connection whose session is read-only.
///
/// # Errors
///
/// Returns an error if the server refuses the connection or the session
/// cannot be configured.
pub fn establish(url: &str) -> Result<MysqlConnection, PersistenceError> {
    let mut conn = MysqlConnection::establish(url)?;

    conn.batch_execute("SET SESSION TRANSACTION READ ONLY")?;
    debug!("MySQL session is read-only");

    Ok(conn)
}
