// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

use crate::column::EntityColumn;
use crate::{EntityKind, Genotype, GenotypeAlias, Genus};

/// Common surface of every DAL entity.
pub trait Entity {
    const KIND: EntityKind;
    const COLUMNS: &'static [EntityColumn];

    /// The stable identity of this record.
    fn id(&self) -> i32;
}

/// An entity of any kind, as returned by providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DalEntity {
    Genus(Genus),
    Genotype(Genotype),
    GenotypeAlias(GenotypeAlias),
}

impl DalEntity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Genus(_) => EntityKind::Genus,
            Self::Genotype(_) => EntityKind::Genotype,
            Self::GenotypeAlias(_) => EntityKind::GenotypeAlias,
        }
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::Genus(e) => e.id(),
            Self::Genotype(e) => e.id(),
            Self::GenotypeAlias(e) => e.id(),
        }
    }
}

impl From<Genus> for DalEntity {
    fn from(value: Genus) -> Self {
        Self::Genus(value)
    }
}

impl From<Genotype> for DalEntity {
    fn from(value: Genotype) -> Self {
        Self::Genotype(value)
    }
}

impl From<GenotypeAlias> for DalEntity {
    fn from(value: GenotypeAlias) -> Self {
        Self::GenotypeAlias(value)
    }
}
