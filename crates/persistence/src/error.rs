// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bms_interop_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while reading the legacy databases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Connection parameters are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Opening a database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Query execution or row decoding failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// The request needs a feature the adapter does not offer yet.
    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),
    /// The entity type does not support the requested operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// No connections are open.
    #[error("Database connections have not been initialised")]
    NotInitialized,
    /// Reference rows the adapter depends on are absent.
    #[error("Missing reference data: {0}")]
    MissingReferenceData(String),
    /// An entity id could not be parsed.
    #[error(transparent)]
    InvalidId(#[from] DomainError),
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::QueryFailed(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
