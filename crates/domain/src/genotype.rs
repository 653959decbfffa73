// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

use crate::column::EntityColumn;
use crate::{Entity, EntityKind};

/// A genotype available for trial units.
///
/// Synonym for genotype can be variety; one genotype may have several
/// specimens growing in various locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genotype {
    pub genotype_id: i32,
    pub genotype_name: String,
    pub genus_id: i32,
    pub species_name: Option<String>,
    pub genotype_acronym: Option<String>,
    pub origin_id: i32,
    pub can_publish_genotype: bool,
    pub genotype_color: Option<String>,
    pub genotype_note: Option<String>,
    pub own_group_id: i32,
    pub access_group_id: i32,
    pub own_group_perm: i32,
    pub access_group_perm: i32,
    pub other_perm: i32,
    /// Obtained through a join on the genus name, never stored.
    pub genus_name: Option<String>,
}

impl Entity for Genotype {
    const KIND: EntityKind = EntityKind::Genotype;
    const COLUMNS: &'static [EntityColumn] = &[
        EntityColumn::integer("genotype_id", "GenotypeId"),
        EntityColumn::string("genotype_name", "GenotypeName", false, 255),
        EntityColumn::integer("genus_id", "GenusId"),
        EntityColumn::string("species_name", "SpeciesName", true, 255),
        EntityColumn::string("genotype_acronym", "GenotypeAcronym", true, 32),
        EntityColumn::integer("origin_id", "OriginId"),
        EntityColumn::boolean("can_publish_genotype", "CanPublishGenotype"),
        EntityColumn::string("genotype_color", "GenotypeColor", true, 32),
        EntityColumn::string("genotype_note", "GenotypeNote", true, 6000),
        EntityColumn::integer("own_group_id", "OwnGroupId"),
        EntityColumn::integer("access_group_id", "AccessGroupId"),
        EntityColumn::integer("own_group_perm", "OwnGroupPerm"),
        EntityColumn::integer("access_group_perm", "AccessGroupPerm"),
        EntityColumn::integer("other_perm", "OtherPerm"),
        EntityColumn::string("genus_name", "GenusName", true, 32).joined(),
    ];

    fn id(&self) -> i32 {
        self.genotype_id
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.genotype_name)
    }
}
