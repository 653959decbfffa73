// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity factories: SQL text for one entity type plus row conversion.
//!
//! A factory knows nothing about connections. It produces statements that
//! run unchanged on either database and turns decoded rows into entities;
//! the provider decides where each statement runs.

mod genotype;
mod genotype_alias;

pub use genotype::{GenotypeFactory, GenotypeRow};
pub use genotype_alias::{GenotypeAliasFactory, GenotypeAliasRow};

use bms_interop_domain::{DalEntity, Entity};

use crate::error::PersistenceError;
use crate::reference::ReferenceData;
use crate::sql::Paging;
use crate::visitor::LegacyRow;

pub trait EntityFactory: Send + Sync + Sized + 'static {
    type Row: LegacyRow;
    type Entity: Entity + Into<DalEntity> + Send + 'static;

    /// Builds a factory for the reference data of the open connections.
    fn from_reference(reference: &ReferenceData) -> Self;

    /// Selects the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotYetImplemented` if the entity type does
    /// not accept the filter.
    fn get_query(&self, id: i32, filter: Option<&str>) -> Result<String, PersistenceError>;

    /// Counts all records.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotYetImplemented` if the entity type does
    /// not accept the filter.
    fn count_query(&self, filter: Option<&str>) -> Result<String, PersistenceError>;

    /// Selects a page of records ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotYetImplemented` if the entity type does
    /// not accept the filter.
    fn list_query(&self, paging: Paging, filter: Option<&str>) -> Result<String, PersistenceError>;

    /// Counts the records that belong to a parent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UnsupportedOperation` unless the entity
    /// type has a parent.
    fn count_children_query(
        &self,
        parent_id: i32,
        filter: Option<&str>,
    ) -> Result<String, PersistenceError> {
        let _ = (parent_id, filter);
        Err(PersistenceError::UnsupportedOperation(format!(
            "{} records have no parent",
            Self::Entity::KIND
        )))
    }

    /// Selects a page of the records that belong to a parent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UnsupportedOperation` unless the entity
    /// type has a parent.
    fn list_children_query(
        &self,
        parent_id: i32,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<String, PersistenceError> {
        let _ = (parent_id, paging, filter);
        Err(PersistenceError::UnsupportedOperation(format!(
            "{} records have no parent",
            Self::Entity::KIND
        )))
    }

    /// Converts a decoded row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot represent a valid entity.
    fn create_entity(&self, row: Self::Row) -> Result<Self::Entity, PersistenceError>;
}
