// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The DAL database adapter.
//!
//! [`BmsDalDatabase`] exposes named operations such as `get/genotype/_id`
//! and `list/genotypealias/_nperpage/page/_num` over a pair of legacy
//! databases. It owns the session registry and the per-session record count
//! cache, and delegates data access to the persistence providers.

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

mod auth;
mod database;
mod error;
mod operation;
mod response;

#[cfg(test)]
mod tests;

pub use auth::{CredentialCheck, DalSession, PASSWORD_PARAM, PasswordCheck, SessionExpiryOption};
pub use database::{
    BmsDalDatabase, BmsDalDatabaseBuilder, DATABASE_VERSION, Providers, register_operations,
};
pub use error::ApiError;
pub use operation::{DalOperation, OperationResult, Pagination, SharedProvider};
pub use response::{DalResponseBuilder, JsonResponseBuilder};
