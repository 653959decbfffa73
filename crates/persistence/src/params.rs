// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection parameters for one legacy database.
//!
//! The URL picks the backend:
//!
//! - `mysql://...` opens a `MySQL`/`MariaDB` connection. Credentials given
//!   separately are injected into the URL when it carries none, and extra
//!   properties are appended as query parameters.
//! - `sqlite://path`, `sqlite:path`, `file:...` URIs and plain paths open a
//!   `SQLite` database. Credentials and properties are ignored.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::PersistenceError;

/// Which database engine a URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Mysql,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub connection_url: String,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl ConnectionParameters {
    #[must_use]
    pub fn new(connection_url: impl Into<String>) -> Self {
        Self {
            connection_url: connection_url.into(),
            user_name: None,
            password: None,
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, user_name: impl Into<String>, password: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The URL up to, but not including, the first `?`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.connection_url
            .split_once('?')
            .map_or(self.connection_url.as_str(), |(base, _)| base)
            .trim()
    }

    #[must_use]
    pub fn backend(&self) -> BackendKind {
        if self
            .connection_url
            .get(..8)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mysql://"))
        {
            BackendKind::Mysql
        } else {
            BackendKind::Sqlite
        }
    }

    /// Two parameter sets address the same database when their base URLs
    /// are equal.
    #[must_use]
    pub fn same_database(&self, other: &Self) -> bool {
        self.base_url() == other.base_url()
    }

    /// Builds the URL handed to the database driver.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Configuration` if the URL is empty.
    pub fn driver_url(&self) -> Result<String, PersistenceError> {
        let url = self.connection_url.trim();
        if url.is_empty() {
            return Err(PersistenceError::Configuration(
                "connection URL is empty".to_string(),
            ));
        }

        match self.backend() {
            BackendKind::Sqlite => Ok(sqlite_target(url).to_string()),
            BackendKind::Mysql => Ok(self.mysql_url(url)),
        }
    }

    fn mysql_url(&self, url: &str) -> String {
        let rest = &url["mysql://".len()..];
        let (authority_and_path, query) = rest
            .split_once('?')
            .map_or((rest, None), |(head, query)| (head, Some(query)));

        let has_credentials = authority_and_path
            .split('/')
            .next()
            .is_some_and(|authority| authority.contains('@'));

        let mut result = String::from("mysql://");
        if !has_credentials && let Some(user) = &self.user_name {
            result.push_str(user);
            if let Some(password) = &self.password {
                result.push(':');
                result.push_str(password);
            }
            result.push('@');
        }
        result.push_str(authority_and_path);

        let mut pairs: Vec<String> = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter(|pair| !pair.is_empty())
            .map(str::to_string)
            .collect();
        for (key, value) in &self.properties {
            let present = pairs
                .iter()
                .any(|pair| pair.split('=').next() == Some(key.as_str()));
            if !present {
                pairs.push(format!("{key}={value}"));
            }
        }
        if !pairs.is_empty() {
            result.push('?');
            result.push_str(&pairs.join("&"));
        }
        result
    }
}

fn sqlite_target(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("connection_url", &self.connection_url)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("properties", &self.properties)
            .finish()
    }
}

impl fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}

/// Rejects a local and central pair that address the same database.
///
/// # Errors
///
/// Returns `PersistenceError::Configuration` naming the shared URL.
pub fn ensure_distinct(
    local: Option<&ConnectionParameters>,
    central: &ConnectionParameters,
) -> Result<(), PersistenceError> {
    match local {
        Some(local) if local.same_database(central) => Err(PersistenceError::Configuration(
            format!(
                "local and central connections both refer to {}",
                central.base_url()
            ),
        )),
        _ => Ok(()),
    }
}
