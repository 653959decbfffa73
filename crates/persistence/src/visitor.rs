// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row-by-row query execution.
//!
//! A query is run with a visitor closure that sees one decoded row at a
//! time and decides whether to keep going. Rows are streamed with Diesel's
//! `load_iter`, so the statement lives exactly as long as the loop in
//! [`perform_query`] and is released on every exit path, early stop and
//! failure included.

use diesel::connection::DefaultLoadingMode;
use diesel::mysql::Mysql;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;
use diesel::{QueryResult, QueryableByName, RunQueryDsl};
use tracing::trace;

use crate::backend::BackendConnection;
use crate::error::PersistenceError;

/// Row types that can be decoded from both supported backends.
pub trait LegacyRow: QueryableByName<Sqlite> + QueryableByName<Mysql> + 'static {}

impl<T> LegacyRow for T where T: QueryableByName<Sqlite> + QueryableByName<Mysql> + 'static {}

/// A visitor's verdict after seeing one row.
#[derive(Debug)]
pub enum Continue {
    /// Deliver the next row.
    Continue,
    /// Stop without error; remaining rows are discarded.
    Stop,
    /// Stop and report the error.
    Error(PersistenceError),
}

/// How a visited query ended.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Every row was delivered.
    Completed,
    /// The visitor asked to stop early.
    Stopped,
    /// The query, a row decode, or the visitor failed.
    Failed(PersistenceError),
}

impl QueryOutcome {
    /// Converts the outcome into a result; `Ok(true)` means the visitor
    /// stopped early.
    ///
    /// # Errors
    ///
    /// Returns the failure carried by `QueryOutcome::Failed`.
    pub fn into_result(self) -> Result<bool, PersistenceError> {
        match self {
            Self::Completed => Ok(false),
            Self::Stopped => Ok(true),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Runs `sql` and feeds each decoded row to `visitor`.
pub fn perform_query<R, V>(conn: &mut BackendConnection, sql: &str, visitor: V) -> QueryOutcome
where
    R: LegacyRow,
    V: FnMut(R) -> Continue,
{
    trace!(backend = conn.backend_name(), sql, "Running query");
    match conn {
        BackendConnection::Sqlite(c) => drive(
            diesel::sql_query(sql).load_iter::<R, DefaultLoadingMode>(c),
            visitor,
        ),
        BackendConnection::Mysql(c) => drive(
            diesel::sql_query(sql).load_iter::<R, DefaultLoadingMode>(c),
            visitor,
        ),
    }
}

fn drive<R, I, V>(rows: QueryResult<I>, mut visitor: V) -> QueryOutcome
where
    I: Iterator<Item = QueryResult<R>>,
    V: FnMut(R) -> Continue,
{
    let rows = match rows {
        Ok(rows) => rows,
        Err(err) => return QueryOutcome::Failed(err.into()),
    };

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(err) => return QueryOutcome::Failed(err.into()),
        };
        match visitor(row) {
            Continue::Continue => {}
            Continue::Stop => return QueryOutcome::Stopped,
            Continue::Error(err) => return QueryOutcome::Failed(err),
        }
    }
    QueryOutcome::Completed
}

#[derive(diesel::QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    record_count: i64,
}

/// Runs a `SELECT COUNT(*) AS record_count ...` query.
///
/// # Errors
///
/// Returns an error if the query fails or yields no row.
pub fn query_count(conn: &mut BackendConnection, sql: &str) -> Result<u64, PersistenceError> {
    let mut count = None;
    perform_query(conn, sql, |row: CountRow| {
        count = Some(row.record_count);
        Continue::Stop
    })
    .into_result()?;

    count
        .map(|n| u64::try_from(n).unwrap_or(0))
        .ok_or_else(|| PersistenceError::QueryFailed(format!("count query returned no row: {sql}")))
}
