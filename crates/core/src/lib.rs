// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure, I/O-free building blocks of the interop adapter.
//!
//! - `template` — operation name templates, the ordered pattern list that
//!   recognises them, and the registry that binds them to entity types
//! - `record_count_cache` — per-session memo table for expensive counts
//! - `session` — the session id to user record registry

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

mod error;
mod record_count_cache;
mod session;
mod template;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use record_count_cache::{RecordCountCache, RecordCountCacheEntry};
pub use session::SessionRegistry;
pub use template::{
    Invocation, OperationRegistry, OperationShape, OperationTemplate, Registration,
    TemplateMatcher,
};
