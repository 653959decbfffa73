// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operations bound to an entity type and its provider.

use std::sync::Arc;

use bms_interop::{Invocation, OperationShape, OperationTemplate, RecordCountCache, Registration};
use bms_interop_domain::{DalEntity, EntityKind};
use bms_interop_persistence::{EntityIterator, EntityProvider, Paging};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;

/// The registered provider type.
pub type SharedProvider = Arc<dyn EntityProvider>;

/// Paging details returned with a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pagination {
    pub page: u64,
    pub num_per_page: u64,
    pub num_of_records: u64,
    pub num_of_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// A single lookup; `None` when nothing has the id.
    Entity(Option<DalEntity>),
    List(Vec<DalEntity>),
    Page {
        pagination: Pagination,
        records: Vec<DalEntity>,
    },
}

/// What an operation needs from the adapter while it runs.
pub(crate) struct ExecutionContext<'a> {
    pub session_id: &'a str,
    pub record_counts: &'a RecordCountCache,
}

/// A template bound to an entity type and the provider that serves it.
#[derive(Clone)]
pub struct DalOperation {
    template: OperationTemplate,
    entity: EntityKind,
    provider: SharedProvider,
}

impl std::fmt::Debug for DalOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DalOperation")
            .field("template", &self.template.template())
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

impl DalOperation {
    pub(crate) fn from_registration(registration: &Registration<SharedProvider>) -> Self {
        Self {
            template: registration.template.clone(),
            entity: registration.entity,
            provider: Arc::clone(&registration.provider),
        }
    }

    #[must_use]
    pub fn template(&self) -> &str {
        self.template.template()
    }

    #[must_use]
    pub const fn shape(&self) -> &OperationShape {
        self.template.shape()
    }

    #[must_use]
    pub const fn entity_kind(&self) -> EntityKind {
        self.entity
    }

    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity.name()
    }

    /// Matches a request path such as `get/genotype/42`.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Invocation> {
        self.template.match_path(path)
    }

    pub(crate) fn execute(
        &self,
        context: &ExecutionContext<'_>,
        invocation: &Invocation,
        filter: Option<&str>,
    ) -> Result<OperationResult, ApiError> {
        debug!(template = self.template(), params = ?invocation.params(), "Executing operation");
        match self.template.shape() {
            OperationShape::Get { .. } => {
                let id = required_param(invocation, "id")?;
                Ok(OperationResult::Entity(self.provider.get_entity(id, filter)?))
            }
            OperationShape::List { .. } => {
                let records = collect(self.provider.create_iterator(Paging::ALL, filter)?)?;
                Ok(OperationResult::List(records))
            }
            OperationShape::PagedList { .. } => self.execute_page(context, invocation, filter),
            OperationShape::ListChildren { parent_param, .. } => {
                let parent_id = required_param(invocation, parent_param)?;
                let records = collect(self.provider.create_id_iterator(
                    parent_id,
                    Paging::ALL,
                    filter,
                )?)?;
                Ok(OperationResult::List(records))
            }
        }
    }

    fn execute_page(
        &self,
        context: &ExecutionContext<'_>,
        invocation: &Invocation,
        filter: Option<&str>,
    ) -> Result<OperationResult, ApiError> {
        let per_page = positive_param(invocation, "nperpage")?;
        let page = positive_param(invocation, "num")?;
        // LIMIT and OFFSET are signed 64-bit in both backends.
        let first = (page - 1)
            .checked_mul(per_page)
            .filter(|first| i64::try_from(*first).is_ok())
            .ok_or_else(|| ApiError::invalid_input("num", "page is out of range"))?;

        let count = self.record_count(context, filter)?;
        let records = collect(
            self.provider
                .create_iterator(Paging::bounded(first, per_page), filter)?,
        )?;

        Ok(OperationResult::Page {
            pagination: Pagination {
                page,
                num_per_page: per_page,
                num_of_records: count,
                num_of_pages: count.div_ceil(per_page),
            },
            records,
        })
    }

    fn record_count(
        &self,
        context: &ExecutionContext<'_>,
        filter: Option<&str>,
    ) -> Result<u64, ApiError> {
        if let Some(entry) = context
            .record_counts
            .get_entry(context.session_id, self.entity, filter)
        {
            return Ok(entry.count);
        }
        let count = self.provider.get_entity_count(filter)?;
        context
            .record_counts
            .set_entry(context.session_id, self.entity, filter, count);
        Ok(count)
    }
}

fn required_param<'a>(invocation: &'a Invocation, name: &str) -> Result<&'a str, ApiError> {
    invocation
        .param(name)
        .ok_or_else(|| ApiError::invalid_input(name, "missing value"))
}

fn positive_param(invocation: &Invocation, name: &str) -> Result<u64, ApiError> {
    let value = required_param(invocation, name)?;
    match value.trim().parse::<u64>() {
        Ok(n) if n >= 1 && i64::try_from(n).is_ok() => Ok(n),
        _ => Err(ApiError::invalid_input(
            name,
            format!("'{value}' is not a positive integer"),
        )),
    }
}

fn collect(iterator: EntityIterator) -> Result<Vec<DalEntity>, ApiError> {
    iterator
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::from)
}
