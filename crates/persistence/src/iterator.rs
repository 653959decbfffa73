// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Paged iteration across the federated connections.
//!
//! A requested page `(first, limit)` is first turned into a plan: one
//! segment per connection that contributes rows, each with its own offset
//! and row budget. Planning counts the rows on every connection except the
//! last, which simply receives whatever is left of the request.
//!
//! Segments are then fetched in bounded batches. Each batch is one
//! statement, so the connection lock is only held while a batch is read.

use std::collections::VecDeque;
use std::sync::Arc;

use bms_interop_domain::DalEntity;
use tracing::debug;

use crate::connections::{ConnectionRole, FederatedConnections};
use crate::error::PersistenceError;
use crate::factory::EntityFactory;
use crate::sql::Paging;
use crate::visitor::{Continue, perform_query, query_count};

/// Rows fetched per statement.
pub const DEFAULT_BATCH_SIZE: u64 = 500;

/// A boxed stream of entities. After an error the stream ends.
pub type EntityIterator = Box<dyn Iterator<Item = Result<DalEntity, PersistenceError>> + Send>;

/// Which records of an entity type to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Children(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    role: ConnectionRole,
    offset: u64,
    remaining: Option<u64>,
}

pub struct FederatedIterator<F: EntityFactory> {
    factory: F,
    connections: Arc<FederatedConnections>,
    scope: ListScope,
    filter: Option<String>,
    segments: VecDeque<Segment>,
    buffer: VecDeque<F::Entity>,
    batch_size: u64,
    finished: bool,
}

impl<F: EntityFactory> FederatedIterator<F> {
    /// Plans the page and prepares the iterator. No rows are read yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a planning count fails or the factory rejects
    /// the filter or scope.
    pub fn new(
        connections: Arc<FederatedConnections>,
        scope: ListScope,
        paging: Paging,
        filter: Option<&str>,
        batch_size: u64,
    ) -> Result<Self, PersistenceError> {
        let factory = F::from_reference(connections.reference());
        // Surface filter and scope rejections before any row is read.
        Self::query(&factory, scope, Paging::bounded(0, 1), filter)?;

        let segments = plan(&factory, &connections, scope, paging, filter)?;
        debug!(?scope, ?paging, segments = segments.len(), "Planned federated page");

        Ok(Self {
            factory,
            connections,
            scope,
            filter: filter.map(str::to_string),
            segments,
            buffer: VecDeque::new(),
            batch_size: batch_size.max(1),
            finished: false,
        })
    }

    fn query(
        factory: &F,
        scope: ListScope,
        paging: Paging,
        filter: Option<&str>,
    ) -> Result<String, PersistenceError> {
        match scope {
            ListScope::All => factory.list_query(paging, filter),
            ListScope::Children(parent) => factory.list_children_query(parent, paging, filter),
        }
    }

    /// Reads the next batch of the current segment into the buffer.
    fn fill(&mut self) -> Result<(), PersistenceError> {
        while self.buffer.is_empty() {
            let Some(segment) = self.segments.front_mut() else {
                return Ok(());
            };
            let batch = segment
                .remaining
                .map_or(self.batch_size, |left| left.min(self.batch_size));
            if batch == 0 {
                self.segments.pop_front();
                continue;
            }

            let sql = Self::query(
                &self.factory,
                self.scope,
                Paging::bounded(segment.offset, batch),
                self.filter.as_deref(),
            )?;
            let conn = self
                .connections
                .connection(segment.role)
                .ok_or(PersistenceError::NotInitialized)?;

            let factory = &self.factory;
            let buffer = &mut self.buffer;
            conn.with_connection(|c| {
                perform_query(c, &sql, |row: F::Row| match factory.create_entity(row) {
                    Ok(entity) => {
                        buffer.push_back(entity);
                        Continue::Continue
                    }
                    Err(err) => Continue::Error(err),
                })
                .into_result()
            })?;

            let fetched = self.buffer.len() as u64;
            segment.offset += fetched;
            segment.remaining = segment.remaining.map(|left| left.saturating_sub(fetched));
            if fetched < batch || segment.remaining == Some(0) {
                self.segments.pop_front();
            }
        }
        Ok(())
    }
}

impl<F: EntityFactory> Iterator for FederatedIterator<F> {
    type Item = Result<DalEntity, PersistenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty()
            && !self.finished
            && let Err(err) = self.fill()
        {
            self.finished = true;
            self.buffer.clear();
            return Some(Err(err));
        }
        match self.buffer.pop_front() {
            Some(entity) => Some(Ok(entity.into())),
            None => {
                self.finished = true;
                None
            }
        }
    }
}

fn plan<F: EntityFactory>(
    factory: &F,
    connections: &FederatedConnections,
    scope: ListScope,
    paging: Paging,
    filter: Option<&str>,
) -> Result<VecDeque<Segment>, PersistenceError> {
    let targets = connections.all_connections();
    let last = targets.len().saturating_sub(1);
    let mut skip = paging.first;
    let mut remaining = paging.limit;
    let mut segments = VecDeque::new();

    for (index, conn) in targets.into_iter().enumerate() {
        if remaining == Some(0) {
            break;
        }
        if index == last {
            segments.push_back(Segment {
                role: conn.role(),
                offset: skip,
                remaining,
            });
            break;
        }

        let sql = match scope {
            ListScope::All => factory.count_query(filter)?,
            ListScope::Children(parent) => factory.count_children_query(parent, filter)?,
        };
        let available = conn.with_connection(|c| query_count(c, &sql))?;
        if skip >= available {
            skip -= available;
            continue;
        }

        let take = remaining.map_or(available - skip, |left| left.min(available - skip));
        segments.push_back(Segment {
            role: conn.role(),
            offset: skip,
            remaining: Some(take),
        });
        remaining = remaining.map(|left| left - take);
        skip = 0;
    }
    Ok(segments)
}

/// Iterates over an in-memory collection with the same paging rules.
#[must_use]
pub fn collection_iterator<T>(items: Vec<T>, paging: Paging) -> EntityIterator
where
    T: Into<DalEntity> + Send + 'static,
{
    let skip = usize::try_from(paging.first).unwrap_or(usize::MAX);
    let take = paging
        .limit
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
    Box::new(items.into_iter().skip(skip).take(take).map(|item| Ok(item.into())))
}
