// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Configuration errors raised while assembling the operation registry.
///
/// These are fatal: they surface when the adapter is constructed and are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No registered pattern recognises the template.
    #[error("Unsupported operation template: '{0}'")]
    UnsupportedTemplate(String),
    /// The template was registered more than once.
    #[error("Operation template registered twice: '{0}'")]
    DuplicateTemplate(String),
    /// A built-in pattern failed to compile.
    #[error("Invalid operation pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
