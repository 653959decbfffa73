// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

use crate::column::EntityColumn;
use crate::{Entity, EntityKind};

/// A genus. The legacy schema has no genus table, so genera are derived
/// from the genus names attached to germplasm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genus {
    pub genus_id: i32,
    pub genus_name: String,
}

impl Genus {
    #[must_use]
    pub const fn new(genus_id: i32, genus_name: String) -> Self {
        Self {
            genus_id,
            genus_name,
        }
    }
}

impl Entity for Genus {
    const KIND: EntityKind = EntityKind::Genus;
    const COLUMNS: &'static [EntityColumn] = &[
        EntityColumn::integer("genus_id", "GenusId"),
        EntityColumn::string("genus_name", "GenusName", false, 32),
    ];

    fn id(&self) -> i32 {
        self.genus_id
    }
}
