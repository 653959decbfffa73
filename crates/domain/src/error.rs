// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised while interpreting domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An entity id was not a decimal integer.
    #[error("Invalid entity id: '{0}'")]
    InvalidId(String),
    /// No entity type is known by the given name.
    #[error("Unknown entity name: '{0}'")]
    UnknownEntity(String),
}
