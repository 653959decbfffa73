// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bms_interop_domain::GenotypeAlias;
use diesel::QueryableByName;
use diesel::sql_types::{Integer, Nullable, Text};

use crate::error::PersistenceError;
use crate::factory::EntityFactory;
use crate::reference::ReferenceData;
use crate::sql::{Paging, and_filter};

#[derive(Debug, QueryableByName)]
pub struct GenotypeAliasRow {
    #[diesel(sql_type = Integer)]
    pub nid: i32,
    #[diesel(sql_type = Text)]
    pub nval: String,
    #[diesel(sql_type = Integer)]
    pub gid: i32,
    #[diesel(sql_type = Integer)]
    pub ntype: i32,
    #[diesel(sql_type = Integer)]
    pub nstat: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub type_name: Option<String>,
}

/// Aliases are the non-genus, non-deleted names of a germplasm record.
///
/// Filters are SQL conditions over `names n` and `udflds u` and are
/// appended as `AND (<filter>)`.
#[derive(Debug, Clone)]
pub struct GenotypeAliasFactory {
    genus_name_type: i32,
}

impl GenotypeAliasFactory {
    #[must_use]
    pub const fn new(genus_name_type: i32) -> Self {
        Self { genus_name_type }
    }

    fn from_where(&self) -> String {
        format!(
            "FROM names n LEFT JOIN udflds u ON u.fldno = n.ntype \
             WHERE n.ntype <> {} AND n.nstat <> 9",
            self.genus_name_type
        )
    }

    fn select(&self) -> String {
        format!(
            "SELECT n.nid, n.nval, n.gid, n.ntype, n.nstat, u.fname AS type_name {}",
            self.from_where()
        )
    }
}

impl EntityFactory for GenotypeAliasFactory {
    type Row = GenotypeAliasRow;
    type Entity = GenotypeAlias;

    fn from_reference(reference: &ReferenceData) -> Self {
        Self::new(reference.genus_name_type)
    }

    fn get_query(&self, id: i32, filter: Option<&str>) -> Result<String, PersistenceError> {
        Ok(format!(
            "{} AND n.nid = {id}{}",
            self.select(),
            and_filter(filter)
        ))
    }

    fn count_query(&self, filter: Option<&str>) -> Result<String, PersistenceError> {
        Ok(format!(
            "SELECT COUNT(*) AS record_count {}{}",
            self.from_where(),
            and_filter(filter)
        ))
    }

    fn list_query(&self, paging: Paging, filter: Option<&str>) -> Result<String, PersistenceError> {
        Ok(format!(
            "{}{} ORDER BY n.nid{}",
            self.select(),
            and_filter(filter),
            paging.clause()
        ))
    }

    fn count_children_query(
        &self,
        parent_id: i32,
        filter: Option<&str>,
    ) -> Result<String, PersistenceError> {
        Ok(format!(
            "SELECT COUNT(*) AS record_count {} AND n.gid = {parent_id}{}",
            self.from_where(),
            and_filter(filter)
        ))
    }

    fn list_children_query(
        &self,
        parent_id: i32,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<String, PersistenceError> {
        Ok(format!(
            "{} AND n.gid = {parent_id}{} ORDER BY n.nid{}",
            self.select(),
            and_filter(filter),
            paging.clause()
        ))
    }

    fn create_entity(&self, row: GenotypeAliasRow) -> Result<GenotypeAlias, PersistenceError> {
        Ok(GenotypeAlias {
            genotype_alias_id: row.nid,
            genotype_alias_name: row.nval,
            genotype_id: row.gid,
            genotype_alias_type: row.ntype,
            genotype_alias_type_name: row.type_name,
            genotype_alias_status: row.nstat,
        })
    }
}
