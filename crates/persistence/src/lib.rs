// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Federated read access to legacy GMS databases.
//!
//! An installation has an optional local database and a mandatory central
//! database with the same schema. Records with negative ids are local,
//! positive ids are central. This crate opens both, reads the reference
//! data the adapter depends on, and serves entities through providers.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`** — used by every standard test (in-memory, shared cache)
//! - **`MariaDB`/`MySQL`** — validated via explicit opt-in tests
//!
//! All statements are raw SQL accepted by both engines and are executed
//! row by row through [`visitor::perform_query`].
//!
//! To run `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against `SQLite` only
//! - Backend validation tests are explicitly marked `#[ignore]`
//! - Seeded fixtures are exported behind the `test-fixtures` feature so
//!   dependent crates test against the same data

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
#![allow(clippy::multiple_crate_versions)]

pub mod backend;
pub mod connections;
mod error;
pub mod factory;
pub mod iterator;
mod params;
pub mod provider;
pub mod reference;
pub mod sql;
pub mod users;
pub mod visitor;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

#[cfg(test)]
mod tests;

pub use backend::BackendConnection;
pub use connections::{
    ConnectionManager, ConnectionRole, FederatedConnections, PhysicalConnection, Progress,
    silent_progress,
};
pub use error::PersistenceError;
pub use iterator::EntityIterator;
pub use params::{BackendKind, ConnectionParameters, ensure_distinct};
pub use provider::{
    EntityProvider, FederatedProvider, GenotypeAliasProvider, GenotypeProvider, GenusProvider,
};
pub use reference::{GenusStore, ReferenceData, UserType};
pub use sql::Paging;
pub use users::UserRecord;
