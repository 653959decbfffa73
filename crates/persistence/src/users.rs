// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookups against the legacy `users` table.
//!
//! User names are matched case-insensitively by upper-casing both sides.
//! Credentials are returned raw; checking them is the caller's concern.

use diesel::QueryableByName;
use diesel::sql_types::{Integer, Nullable, Text};
use tracing::debug;

use crate::connections::PhysicalConnection;
use crate::error::PersistenceError;
use crate::sql::quote_literal;
use crate::visitor::{Continue, perform_query};

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct UserRecord {
    #[diesel(sql_type = Integer)]
    pub userid: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub upswd: Option<String>,
    #[diesel(sql_type = Integer)]
    pub instalid: i32,
    #[diesel(sql_type = Integer)]
    pub ustatus: i32,
    #[diesel(sql_type = Integer)]
    pub uaccess: i32,
    #[diesel(sql_type = Integer)]
    pub utype: i32,
    #[diesel(sql_type = Integer)]
    pub personid: i32,
    #[diesel(sql_type = Nullable<Integer>)]
    pub adate: Option<i32>,
}

/// Finds the first user whose name matches, ignoring case.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_user(
    conn: &PhysicalConnection,
    user_name: &str,
) -> Result<Option<UserRecord>, PersistenceError> {
    conn.with_connection(|c| {
        let sql = format!(
            "SELECT userid, upswd, instalid, ustatus, uaccess, utype, personid, adate \
             FROM users WHERE UPPER(uname) = {} ORDER BY userid",
            quote_literal(&user_name.to_uppercase(), c.kind())
        );
        let mut found = None;
        perform_query(c, &sql, |row: UserRecord| {
            found = Some(row);
            Continue::Stop
        })
        .into_result()?;
        debug!(user_name, found = found.is_some(), "Looked up user");
        Ok(found)
    })
}
