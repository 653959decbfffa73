// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Federated connections to the local and central databases.
//!
//! Record ownership follows the sign of the primary key: negative ids live
//! in the local database, positive ids in the central one. Id `0` belongs
//! to neither. Iteration visits local records before central records.
//!
//! Each physical connection is guarded by its own mutex. The guard is held
//! for the lifetime of one statement and released when the statement is,
//! so a paged iterator never pins a connection between batches.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::backend::BackendConnection;
use crate::error::PersistenceError;
use crate::params::{ConnectionParameters, ensure_distinct};
use crate::reference::{
    GenusStore, ReferenceData, load_genus_name_type, load_genus_names, load_user_types,
};

/// Receives human-readable status messages while connections are opened.
pub type Progress = dyn Fn(&str) + Send + Sync;

/// A progress sink that discards every message.
pub fn silent_progress(_: &str) {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionRole {
    Local,
    Central,
}

impl std::fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Central => f.write_str("central"),
        }
    }
}

/// One open database connection.
#[derive(Debug)]
pub struct PhysicalConnection {
    role: ConnectionRole,
    url: String,
    conn: Mutex<Option<BackendConnection>>,
}

impl PhysicalConnection {
    /// Opens the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    pub fn open(role: ConnectionRole, params: &ConnectionParameters) -> Result<Self, PersistenceError> {
        let conn = BackendConnection::establish(params)?;
        Ok(Self {
            role,
            url: params.base_url().to_string(),
            conn: Mutex::new(Some(conn)),
        })
    }

    #[must_use]
    pub const fn role(&self) -> ConnectionRole {
        self.role
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn guard(&self) -> MutexGuard<'_, Option<BackendConnection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive use of the connection.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotInitialized` if the connection has been
    /// closed, or whatever `f` returns.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut BackendConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut guard = self.guard();
        let conn = guard.as_mut().ok_or(PersistenceError::NotInitialized)?;
        f(conn)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.guard().is_some()
    }

    /// Closes the connection. Closing twice is harmless.
    pub fn close(&self) -> bool {
        let closed = self.guard().take().is_some();
        if closed {
            info!(role = %self.role, url = %self.url, "Closed database connection");
        }
        closed
    }
}

/// The open connections plus the reference data read through them.
#[derive(Debug)]
pub struct FederatedConnections {
    local: Option<PhysicalConnection>,
    central: PhysicalConnection,
    reference: ReferenceData,
}

impl FederatedConnections {
    /// Opens both connections and loads the reference data.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters address the same database, a
    /// connection fails, or reference data is missing. Connections opened
    /// before the failure are closed.
    pub fn open(
        local: Option<&ConnectionParameters>,
        central: &ConnectionParameters,
        progress: &Progress,
    ) -> Result<Self, PersistenceError> {
        ensure_distinct(local, central)?;

        let local = match local {
            Some(params) => {
                progress(&format!("Connecting to local database {params}"));
                Some(PhysicalConnection::open(ConnectionRole::Local, params)?)
            }
            None => None,
        };
        progress(&format!("Connecting to central database {central}"));
        let central = PhysicalConnection::open(ConnectionRole::Central, central)?;

        let reference = match Self::load_reference(local.as_ref(), &central, progress) {
            Ok(reference) => reference,
            Err(err) => {
                warn!(error = %err, "Failed to load reference data");
                if let Some(local) = &local {
                    local.close();
                }
                central.close();
                return Err(err);
            }
        };

        progress("Database connections ready");
        Ok(Self {
            local,
            central,
            reference,
        })
    }

    fn load_reference(
        local: Option<&PhysicalConnection>,
        central: &PhysicalConnection,
        progress: &Progress,
    ) -> Result<ReferenceData, PersistenceError> {
        progress("Loading user types");
        let user_types = central.with_connection(load_user_types)?;
        let genus_name_type = central.with_connection(load_genus_name_type)?;

        progress("Loading genera");
        let mut names = Vec::new();
        for conn in local.into_iter().chain(std::iter::once(central)) {
            names.extend(conn.with_connection(|c| load_genus_names(c, genus_name_type))?);
        }
        let genera = Arc::new(GenusStore::from_names(names));
        info!(genera = genera.len(), "Built genus catalogue");

        Ok(ReferenceData {
            user_types,
            genus_name_type,
            genera,
        })
    }

    /// All connections in iteration order: local first, then central.
    #[must_use]
    pub fn all_connections(&self) -> Vec<&PhysicalConnection> {
        self.local
            .iter()
            .chain(std::iter::once(&self.central))
            .collect()
    }

    /// The connection that owns the given id, if any.
    #[must_use]
    pub fn connection_for(&self, id: i32) -> Option<&PhysicalConnection> {
        match id {
            id if id < 0 => self.local.as_ref(),
            id if id > 0 => Some(&self.central),
            _ => None,
        }
    }

    #[must_use]
    pub fn connection(&self, role: ConnectionRole) -> Option<&PhysicalConnection> {
        match role {
            ConnectionRole::Local => self.local.as_ref(),
            ConnectionRole::Central => Some(&self.central),
        }
    }

    #[must_use]
    pub const fn central(&self) -> &PhysicalConnection {
        &self.central
    }

    #[must_use]
    pub const fn has_local(&self) -> bool {
        self.local.is_some()
    }

    #[must_use]
    pub const fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn close_connections(&self) {
        for conn in self.all_connections() {
            conn.close();
        }
    }
}

/// Owns the connection parameters and, once initialised, the open
/// connections.
#[derive(Debug)]
pub struct ConnectionManager {
    local: Option<ConnectionParameters>,
    central: ConnectionParameters,
    current: Mutex<Option<Arc<FederatedConnections>>>,
}

impl ConnectionManager {
    /// Records the parameters without opening anything.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Configuration` if local and central
    /// address the same database.
    pub fn new(
        local: Option<ConnectionParameters>,
        central: ConnectionParameters,
    ) -> Result<Self, PersistenceError> {
        ensure_distinct(local.as_ref(), &central)?;
        Ok(Self {
            local,
            central,
            current: Mutex::new(None),
        })
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<FederatedConnections>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the connections unless they are already open.
    ///
    /// Concurrent callers are serialised; only the first one connects.
    ///
    /// # Errors
    ///
    /// Returns an error if opening the connections fails. The manager stays
    /// uninitialised in that case.
    pub fn initialise(&self, progress: &Progress) -> Result<Arc<FederatedConnections>, PersistenceError> {
        let mut slot = self.slot();
        if let Some(current) = slot.as_ref() {
            return Ok(Arc::clone(current));
        }
        let connections = Arc::new(FederatedConnections::open(
            self.local.as_ref(),
            &self.central,
            progress,
        )?);
        *slot = Some(Arc::clone(&connections));
        Ok(connections)
    }

    /// The open connections.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotInitialized` before initialisation or
    /// after shutdown.
    pub fn current(&self) -> Result<Arc<FederatedConnections>, PersistenceError> {
        self.slot().clone().ok_or(PersistenceError::NotInitialized)
    }

    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.slot().is_some()
    }

    #[must_use]
    pub const fn local_parameters(&self) -> Option<&ConnectionParameters> {
        self.local.as_ref()
    }

    #[must_use]
    pub const fn central_parameters(&self) -> &ConnectionParameters {
        &self.central
    }

    /// Closes every connection. Iterators still holding the old connections
    /// fail with `NotInitialized` on their next batch.
    pub fn shutdown(&self) {
        if let Some(connections) = self.slot().take() {
            connections.close_connections();
        }
    }
}
