// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

/// Semantic type of an entity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    String,
    Boolean,
}

impl ColumnType {
    /// The DAL data type name reported in field listings.
    #[must_use]
    pub const fn dal_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "varchar",
            Self::Boolean => "tinyint",
        }
    }
}

/// Binds an entity attribute to its DAL column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityColumn {
    /// Attribute name on the Rust struct.
    pub attribute: &'static str,
    /// Column name exposed to DAL clients.
    pub column: &'static str,
    pub nullable: bool,
    pub column_type: ColumnType,
    /// Maximum length for string columns.
    pub max_length: Option<u32>,
    /// True when the value is obtained through a join rather than stored.
    pub derived: bool,
}

impl EntityColumn {
    pub(crate) const fn integer(attribute: &'static str, column: &'static str) -> Self {
        Self {
            attribute,
            column,
            nullable: false,
            column_type: ColumnType::Integer,
            max_length: None,
            derived: false,
        }
    }

    pub(crate) const fn string(
        attribute: &'static str,
        column: &'static str,
        nullable: bool,
        max_length: u32,
    ) -> Self {
        Self {
            attribute,
            column,
            nullable,
            column_type: ColumnType::String,
            max_length: Some(max_length),
            derived: false,
        }
    }

    pub(crate) const fn boolean(attribute: &'static str, column: &'static str) -> Self {
        Self {
            attribute,
            column,
            nullable: false,
            column_type: ColumnType::Boolean,
            max_length: None,
            derived: false,
        }
    }

    pub(crate) const fn joined(self) -> Self {
        Self {
            derived: true,
            nullable: true,
            ..self
        }
    }
}
