// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

use crate::column::EntityColumn;
use crate::error::DomainError;
use crate::{Entity, Genotype, GenotypeAlias, Genus};

/// The entity types served by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    Genus,
    Genotype,
    GenotypeAlias,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Genus, Self::Genotype, Self::GenotypeAlias];

    /// Lower-case name used in operation templates.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Genus => "genus",
            Self::Genotype => "genotype",
            Self::GenotypeAlias => "genotypealias",
        }
    }

    /// Tag name used when the entity is written to a DAL response.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Genus => "Genus",
            Self::Genotype => "Genotype",
            Self::GenotypeAlias => "GenotypeAlias",
        }
    }

    #[must_use]
    pub const fn columns(self) -> &'static [EntityColumn] {
        match self {
            Self::Genus => Genus::COLUMNS,
            Self::Genotype => Genotype::COLUMNS,
            Self::GenotypeAlias => GenotypeAlias::COLUMNS,
        }
    }

    /// Resolves an entity kind from a name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEntity` if no kind has that name.
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DomainError::UnknownEntity(name.to_string()))
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
