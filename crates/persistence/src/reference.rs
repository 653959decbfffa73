// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data read once when connections are opened.
//!
//! - user types (`udflds` rows with `ftable = 'USERS'`, `ftype = 'UTYPE'`)
//! - the field number of the genus name type (`fcode = 'GENUS'`)
//! - the genus catalogue, built from distinct genus names across every
//!   connection

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bms_interop_domain::Genus;
use diesel::QueryableByName;
use diesel::sql_types::{Integer, Text};
use tracing::{debug, info};

use crate::backend::BackendConnection;
use crate::error::PersistenceError;
use crate::visitor::{Continue, perform_query};

const USER_TYPES_SQL: &str = "SELECT fldno, fcode, fname FROM udflds \
     WHERE ftable = 'USERS' AND ftype = 'UTYPE' ORDER BY fldno";

const GENUS_NAME_TYPE_SQL: &str = "SELECT fldno, fcode, fname FROM udflds \
     WHERE ftable = 'NAMES' AND ftype = 'NAME' AND fcode = 'GENUS' ORDER BY fldno";

/// Fragment of a user type name that marks its members as group owners.
const OWNER_MARKER: &str = "ADMINISTRATOR";

#[derive(QueryableByName)]
struct FieldRow {
    #[diesel(sql_type = Integer)]
    fldno: i32,
    #[diesel(sql_type = Text)]
    fcode: String,
    #[diesel(sql_type = Text)]
    fname: String,
}

#[derive(QueryableByName)]
struct GenusNameRow {
    #[diesel(sql_type = Text)]
    genus_name: String,
}

/// One legacy user type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserType {
    pub type_code: i32,
    pub code: String,
    pub name: String,
}

impl UserType {
    #[must_use]
    pub fn is_group_owner(&self) -> bool {
        self.name.to_ascii_uppercase().contains(OWNER_MARKER)
    }
}

/// The genus catalogue.
///
/// Genus names are compared case-insensitively. Ids run from 1 in name
/// order and stay stable for the life of the connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenusStore {
    genera: Vec<Genus>,
    by_name: HashMap<String, i32>,
}

impl GenusStore {
    /// Builds the catalogue from raw names, which may repeat in any case.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut distinct: BTreeMap<String, String> = BTreeMap::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            distinct
                .entry(name.to_lowercase())
                .and_modify(|kept| {
                    if name < kept.as_str() {
                        *kept = name.to_string();
                    }
                })
                .or_insert_with(|| name.to_string());
        }

        let mut genera = Vec::with_capacity(distinct.len());
        let mut by_name = HashMap::with_capacity(distinct.len());
        for (id, (key, name)) in (1..).zip(distinct) {
            by_name.insert(key, id);
            genera.push(Genus::new(id, name));
        }
        Self { genera, by_name }
    }

    #[must_use]
    pub fn get(&self, genus_id: i32) -> Option<&Genus> {
        usize::try_from(genus_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.genera.get(index))
    }

    /// Looks up the id of a genus name, ignoring case.
    #[must_use]
    pub fn id_for(&self, genus_name: &str) -> Option<i32> {
        self.by_name.get(&genus_name.trim().to_lowercase()).copied()
    }

    #[must_use]
    pub fn values(&self) -> &[Genus] {
        &self.genera
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genera.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genera.is_empty()
    }
}

/// Everything loaded from the legacy reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub user_types: BTreeMap<i32, UserType>,
    pub genus_name_type: i32,
    pub genera: Arc<GenusStore>,
}

impl ReferenceData {
    #[must_use]
    pub fn user_type(&self, type_code: i32) -> Option<&UserType> {
        self.user_types.get(&type_code)
    }
}

/// Reads the user types from the central database.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_user_types(
    conn: &mut BackendConnection,
) -> Result<BTreeMap<i32, UserType>, PersistenceError> {
    let mut user_types = BTreeMap::new();
    perform_query(conn, USER_TYPES_SQL, |row: FieldRow| {
        user_types.insert(
            row.fldno,
            UserType {
                type_code: row.fldno,
                code: row.fcode,
                name: row.fname,
            },
        );
        Continue::Continue
    })
    .into_result()?;
    info!(count = user_types.len(), "Loaded user types");
    Ok(user_types)
}

/// Reads the field number used for genus names.
///
/// # Errors
///
/// Returns `PersistenceError::MissingReferenceData` if no genus name type is
/// defined, or a query error.
pub fn load_genus_name_type(conn: &mut BackendConnection) -> Result<i32, PersistenceError> {
    let mut fldno = None;
    perform_query(conn, GENUS_NAME_TYPE_SQL, |row: FieldRow| {
        debug!(fldno = row.fldno, name = %row.fname, "Found genus name type");
        fldno = Some(row.fldno);
        Continue::Stop
    })
    .into_result()?;
    fldno.ok_or_else(|| {
        PersistenceError::MissingReferenceData("no NAMES field with code GENUS".to_string())
    })
}

/// Reads the distinct genus names held by one database.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_genus_names(
    conn: &mut BackendConnection,
    genus_name_type: i32,
) -> Result<Vec<String>, PersistenceError> {
    let sql = format!(
        "SELECT DISTINCT nval AS genus_name FROM names \
         WHERE ntype = {genus_name_type} AND nstat <> 9"
    );
    let mut names = Vec::new();
    perform_query(conn, &sql, |row: GenusNameRow| {
        names.push(row.genus_name);
        Continue::Continue
    })
    .into_result()?;
    Ok(names)
}
