// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the adapter.

use bms_interop::CoreError;
use bms_interop_domain::DomainError;
use bms_interop_persistence::PersistenceError;
use thiserror::Error;

/// Errors surfaced by [`crate::BmsDalDatabase`].
///
/// Authentication failures carry only a generic reason so callers cannot
/// tell an unknown user from a wrong credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The adapter was assembled with unusable settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The call shape is not supported for this entity type.
    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),
    /// The entity type does not define the requested relationship.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// The reason is generic. A lookup failure is kept as the source and
    /// left out of the message.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        reason: String,
        #[source]
        cause: Option<PersistenceError>,
    },
    /// A query or connection failed.
    #[error("Database error: {source}")]
    Database {
        #[source]
        source: PersistenceError,
    },
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Missing required reference data: {0}")]
    MissingReferenceData(String),
    #[error("Database connections have not been initialised")]
    NotInitialized,
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },
    #[error("Unknown table name: '{0}'")]
    UnknownTable(String),
    /// No registered operation matches the request path.
    #[error("Unknown operation: '{0}'")]
    UnknownOperation(String),
}

impl ApiError {
    pub(crate) fn authentication(reason: &str) -> Self {
        Self::AuthenticationFailed {
            reason: reason.to_string(),
            cause: None,
        }
    }

    pub(crate) fn authentication_caused_by(reason: &str, cause: PersistenceError) -> Self {
        Self::AuthenticationFailed {
            reason: reason.to_string(),
            cause: Some(cause),
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Configuration(msg) => Self::Configuration(msg),
            PersistenceError::NotYetImplemented(msg) => Self::NotYetImplemented(msg),
            PersistenceError::UnsupportedOperation(msg) => Self::UnsupportedOperation(msg),
            PersistenceError::NotInitialized => Self::NotInitialized,
            PersistenceError::MissingReferenceData(msg) => Self::MissingReferenceData(msg),
            PersistenceError::InvalidId(err) => err.into(),
            source @ (PersistenceError::DatabaseConnectionFailed(_)
            | PersistenceError::QueryFailed(_)) => Self::Database { source },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(value) => {
                Self::invalid_input("id", format!("'{value}' is not an integer"))
            }
            DomainError::UnknownEntity(name) => Self::UnknownTable(name),
        }
    }
}
