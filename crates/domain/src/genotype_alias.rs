// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

use crate::column::EntityColumn;
use crate::{Entity, EntityKind};

/// An alternative name for a genotype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenotypeAlias {
    pub genotype_alias_id: i32,
    pub genotype_alias_name: String,
    pub genotype_id: i32,
    pub genotype_alias_type: i32,
    /// Name of the alias type, joined from the field definitions table.
    pub genotype_alias_type_name: Option<String>,
    pub genotype_alias_status: i32,
}

impl Entity for GenotypeAlias {
    const KIND: EntityKind = EntityKind::GenotypeAlias;
    const COLUMNS: &'static [EntityColumn] = &[
        EntityColumn::integer("genotype_alias_id", "GenotypeAliasId"),
        EntityColumn::string("genotype_alias_name", "GenotypeAliasName", false, 255),
        EntityColumn::integer("genotype_id", "GenotypeId"),
        EntityColumn::integer("genotype_alias_type", "GenotypeAliasType"),
        EntityColumn::string("genotype_alias_type_name", "GenotypeAliasTypeName", true, 50)
            .joined(),
        EntityColumn::integer("genotype_alias_status", "GenotypeAliasStatus"),
    ];

    fn id(&self) -> i32 {
        self.genotype_alias_id
    }
}
