// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use bms_interop_domain::{Entity, Genotype};
use diesel::QueryableByName;
use diesel::sql_types::{Integer, Nullable, Text};

use crate::error::PersistenceError;
use crate::factory::EntityFactory;
use crate::reference::{GenusStore, ReferenceData};
use crate::sql::Paging;

/// A germplasm row with its display name and genus name.
#[derive(Debug, QueryableByName)]
pub struct GenotypeRow {
    #[diesel(sql_type = Integer)]
    pub gid: i32,
    #[diesel(sql_type = Integer)]
    pub glocn: i32,
    #[diesel(sql_type = Integer)]
    pub germuid: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub genotype_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub genus_name: Option<String>,
}

/// Genotypes are germplasm records that have not been replaced.
///
/// The name is the preferred name (`nstat = 1`), falling back to the
/// oldest name. The genus comes from the name typed as genus.
#[derive(Debug, Clone)]
pub struct GenotypeFactory {
    genus_name_type: i32,
    genera: Arc<GenusStore>,
}

impl GenotypeFactory {
    #[must_use]
    pub const fn new(genus_name_type: i32, genera: Arc<GenusStore>) -> Self {
        Self {
            genus_name_type,
            genera,
        }
    }

    fn select(&self) -> String {
        format!(
            "SELECT g.gid, g.glocn, g.germuid, \
             (SELECT n.nval FROM names n WHERE n.gid = g.gid AND n.nstat <> 9 \
              AND n.ntype <> {genus} \
              ORDER BY CASE WHEN n.nstat = 1 THEN 0 ELSE 1 END, n.nid LIMIT 1) AS genotype_name, \
             (SELECT a.nval FROM names a WHERE a.gid = g.gid AND a.nstat <> 9 \
              AND a.ntype = {genus} ORDER BY a.nid LIMIT 1) AS genus_name \
             FROM germplsm g WHERE g.grplce = 0",
            genus = self.genus_name_type
        )
    }

    fn reject_filter(filter: Option<&str>) -> Result<(), PersistenceError> {
        match filter.map(str::trim) {
            Some(f) if !f.is_empty() => Err(PersistenceError::NotYetImplemented(format!(
                "filtering {} records",
                Genotype::KIND
            ))),
            _ => Ok(()),
        }
    }
}

impl EntityFactory for GenotypeFactory {
    type Row = GenotypeRow;
    type Entity = Genotype;

    fn from_reference(reference: &ReferenceData) -> Self {
        Self::new(reference.genus_name_type, Arc::clone(&reference.genera))
    }

    fn get_query(&self, id: i32, filter: Option<&str>) -> Result<String, PersistenceError> {
        Self::reject_filter(filter)?;
        Ok(format!("{} AND g.gid = {id}", self.select()))
    }

    fn count_query(&self, filter: Option<&str>) -> Result<String, PersistenceError> {
        Self::reject_filter(filter)?;
        Ok("SELECT COUNT(*) AS record_count FROM germplsm g WHERE g.grplce = 0".to_string())
    }

    fn list_query(&self, paging: Paging, filter: Option<&str>) -> Result<String, PersistenceError> {
        Self::reject_filter(filter)?;
        Ok(format!("{} ORDER BY g.gid{}", self.select(), paging.clause()))
    }

    fn create_entity(&self, row: GenotypeRow) -> Result<Genotype, PersistenceError> {
        let genus = row
            .genus_name
            .as_deref()
            .and_then(|name| self.genera.id_for(name))
            .and_then(|id| self.genera.get(id));

        Ok(Genotype {
            genotype_id: row.gid,
            genotype_name: row.genotype_name.unwrap_or_else(|| format!("GID{}", row.gid)),
            genus_id: genus.map_or(0, |g| g.genus_id),
            species_name: None,
            genotype_acronym: None,
            origin_id: row.glocn,
            can_publish_genotype: false,
            genotype_color: None,
            genotype_note: None,
            own_group_id: row.germuid,
            access_group_id: 0,
            own_group_perm: 1,
            access_group_perm: 1,
            other_perm: 1,
            genus_name: genus.map(|g| g.genus_name.clone()).or(row.genus_name),
        })
    }
}
