// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity types for the BMS interop adapter.
//!
//! Every entity exposed through the DAL interface is a plain struct with
//! typed attributes plus a static table of column descriptors. The column
//! tables drive field listings and filter construction; no reflection is
//! involved because the descriptor set is fixed at build time.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod column;
mod entity;
mod error;
mod genotype;
mod genotype_alias;
mod genus;
mod kind;
mod user;

#[cfg(test)]
mod tests;

pub use column::{ColumnType, EntityColumn};
pub use entity::{DalEntity, Entity};
pub use error::DomainError;
pub use genotype::Genotype;
pub use genotype_alias::GenotypeAlias;
pub use genus::Genus;
pub use kind::EntityKind;
pub use user::{SystemGroupInfo, UserInfo};

/// Parses an entity id supplied as text (for example an operation placeholder).
///
/// # Errors
///
/// Returns `DomainError::InvalidId` if the value is not a decimal integer.
pub fn parse_entity_id(value: &str) -> Result<i32, DomainError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| DomainError::InvalidId(value.to_string()))
}
