// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity providers: the per-type data sources behind DAL operations.

use std::marker::PhantomData;
use std::sync::Arc;

use bms_interop_domain::{DalEntity, Entity, EntityKind, Genus, parse_entity_id};
use tracing::debug;

use crate::connections::ConnectionManager;
use crate::error::PersistenceError;
use crate::factory::{EntityFactory, GenotypeAliasFactory, GenotypeFactory};
use crate::iterator::{
    DEFAULT_BATCH_SIZE, EntityIterator, FederatedIterator, ListScope, collection_iterator,
};
use crate::sql::Paging;
use crate::visitor::{Continue, perform_query, query_count};

/// A source of entities of one type.
///
/// Ids arrive as text because they come straight from operation
/// placeholders; malformed ids fail with `PersistenceError::InvalidId`.
pub trait EntityProvider: Send + Sync {
    fn entity_kind(&self) -> EntityKind;

    /// Fetches one entity, or `None` if no database owns the id or the
    /// record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is malformed, the filter is not
    /// supported, or the query fails.
    fn get_entity(&self, id: &str, filter: Option<&str>)
    -> Result<Option<DalEntity>, PersistenceError>;

    /// Counts the entities matching the filter across all connections.
    ///
    /// # Errors
    ///
    /// Returns an error if any connection fails to count.
    fn get_entity_count(&self, filter: Option<&str>) -> Result<u64, PersistenceError>;

    /// Iterates over a page of entities in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be planned.
    fn create_iterator(
        &self,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError>;

    /// Iterates over the entities that belong to a parent record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UnsupportedOperation` if the type has no
    /// parent, or an error if the page cannot be planned.
    fn create_id_iterator(
        &self,
        parent_id: &str,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError>;
}

/// Provider for entity types stored in the legacy tables of both databases.
pub struct FederatedProvider<F> {
    connections: Arc<ConnectionManager>,
    batch_size: u64,
    factory: PhantomData<fn() -> F>,
}

pub type GenotypeProvider = FederatedProvider<GenotypeFactory>;
pub type GenotypeAliasProvider = FederatedProvider<GenotypeAliasFactory>;

impl<F: EntityFactory> FederatedProvider<F> {
    #[must_use]
    pub const fn new(connections: Arc<ConnectionManager>) -> Self {
        Self {
            connections,
            batch_size: DEFAULT_BATCH_SIZE,
            factory: PhantomData,
        }
    }

    /// Overrides how many rows each statement fetches while iterating.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl<F: EntityFactory> EntityProvider for FederatedProvider<F> {
    fn entity_kind(&self) -> EntityKind {
        F::Entity::KIND
    }

    fn get_entity(
        &self,
        id: &str,
        filter: Option<&str>,
    ) -> Result<Option<DalEntity>, PersistenceError> {
        let connections = self.connections.current()?;
        let factory = F::from_reference(connections.reference());
        let id = parse_entity_id(id)?;
        let sql = factory.get_query(id, filter)?;

        let Some(conn) = connections.connection_for(id) else {
            debug!(kind = %F::Entity::KIND, id, "No database owns this id");
            return Ok(None);
        };

        conn.with_connection(|c| {
            let mut found: Option<DalEntity> = None;
            perform_query(c, &sql, |row: F::Row| match factory.create_entity(row) {
                Ok(entity) => {
                    found = Some(entity.into());
                    Continue::Stop
                }
                Err(err) => Continue::Error(err),
            })
            .into_result()?;
            Ok(found)
        })
    }

    fn get_entity_count(&self, filter: Option<&str>) -> Result<u64, PersistenceError> {
        let connections = self.connections.current()?;
        let factory = F::from_reference(connections.reference());
        let sql = factory.count_query(filter)?;

        let mut total = 0;
        for conn in connections.all_connections() {
            let count = conn.with_connection(|c| query_count(c, &sql))?;
            debug!(kind = %F::Entity::KIND, role = %conn.role(), count, "Counted records");
            total += count;
        }
        Ok(total)
    }

    fn create_iterator(
        &self,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError> {
        let connections = self.connections.current()?;
        let iterator = FederatedIterator::<F>::new(
            connections,
            ListScope::All,
            paging,
            filter,
            self.batch_size,
        )?;
        Ok(Box::new(iterator))
    }

    fn create_id_iterator(
        &self,
        parent_id: &str,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError> {
        let connections = self.connections.current()?;
        let parent_id = parse_entity_id(parent_id)?;
        let iterator = FederatedIterator::<F>::new(
            connections,
            ListScope::Children(parent_id),
            paging,
            filter,
            self.batch_size,
        )?;
        Ok(Box::new(iterator))
    }
}

/// Provider for the genus catalogue built when the connections opened.
///
/// Filters are not supported.
pub struct GenusProvider {
    connections: Arc<ConnectionManager>,
}

impl GenusProvider {
    #[must_use]
    pub const fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    fn reject_filter(filter: Option<&str>) -> Result<(), PersistenceError> {
        match filter.map(str::trim) {
            Some(f) if !f.is_empty() => Err(PersistenceError::NotYetImplemented(format!(
                "filtering {} records",
                Genus::KIND
            ))),
            _ => Ok(()),
        }
    }
}

impl EntityProvider for GenusProvider {
    fn entity_kind(&self) -> EntityKind {
        Genus::KIND
    }

    fn get_entity(
        &self,
        id: &str,
        filter: Option<&str>,
    ) -> Result<Option<DalEntity>, PersistenceError> {
        Self::reject_filter(filter)?;
        let connections = self.connections.current()?;
        let id = parse_entity_id(id)?;
        Ok(connections
            .reference()
            .genera
            .get(id)
            .cloned()
            .map(DalEntity::from))
    }

    fn get_entity_count(&self, filter: Option<&str>) -> Result<u64, PersistenceError> {
        Self::reject_filter(filter)?;
        let connections = self.connections.current()?;
        Ok(connections.reference().genera.len() as u64)
    }

    fn create_iterator(
        &self,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError> {
        Self::reject_filter(filter)?;
        let connections = self.connections.current()?;
        let genera = connections.reference().genera.values().to_vec();
        Ok(collection_iterator(genera, paging))
    }

    fn create_id_iterator(
        &self,
        _parent_id: &str,
        _paging: Paging,
        _filter: Option<&str>,
    ) -> Result<EntityIterator, PersistenceError> {
        Err(PersistenceError::UnsupportedOperation(format!(
            "{} records have no parent",
            Genus::KIND
        )))
    }
}
