// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQL text helpers shared by both backends.

use crate::params::BackendKind;

/// Which slice of an ordered result set to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paging {
    /// Zero-based index of the first row.
    pub first: u64,
    /// Maximum number of rows; `None` is unbounded.
    pub limit: Option<u64>,
}

impl Paging {
    /// Every row.
    pub const ALL: Self = Self {
        first: 0,
        limit: None,
    };

    /// Builds paging from a first record and a record count where any
    /// count `<= 0` means unbounded.
    #[must_use]
    pub fn new(first: u64, n_records: i64) -> Self {
        Self {
            first,
            limit: u64::try_from(n_records).ok().filter(|n| *n > 0),
        }
    }

    #[must_use]
    pub const fn bounded(first: u64, limit: u64) -> Self {
        Self {
            first,
            limit: Some(limit),
        }
    }

    /// The trailing `LIMIT`/`OFFSET` clause, with a leading space.
    ///
    /// `MySQL` has no `OFFSET` without `LIMIT`, so an unbounded page past the
    /// first row uses the largest signed 64-bit limit.
    #[must_use]
    pub fn clause(self) -> String {
        match (self.limit, self.first) {
            (None, 0) => String::new(),
            (None, first) => format!(" LIMIT {} OFFSET {first}", i64::MAX),
            (Some(limit), 0) => format!(" LIMIT {limit}"),
            (Some(limit), first) => format!(" LIMIT {limit} OFFSET {first}"),
        }
    }
}

/// Quotes a string literal for inclusion in SQL text.
///
/// `MySQL` treats backslash as an escape character inside literals; `SQLite`
/// does not.
#[must_use]
pub fn quote_literal(value: &str, backend: BackendKind) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => quoted.push_str("''"),
            '\\' if backend == BackendKind::Mysql => quoted.push_str("\\\\"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// ` AND (<filter>)`, or nothing for an absent or blank filter.
#[must_use]
pub fn and_filter(filter: Option<&str>) -> String {
    match filter.map(str::trim) {
        Some(f) if !f.is_empty() => format!(" AND ({f})"),
        _ => String::new(),
    }
}
