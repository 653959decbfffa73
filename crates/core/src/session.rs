// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bms_interop_domain::UserInfo;

/// Authenticated users keyed by session id.
///
/// A session holds at most one user record. Records are inserted by login
/// and removed by logout; the map is never handed out for iteration.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: RwLock<HashMap<String, UserInfo>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a user to a session, returning the record it replaced.
    pub fn login(&self, session_id: &str, user: UserInfo) -> Option<UserInfo> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.to_string(), user)
    }

    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<UserInfo> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, session_id: &str) -> bool {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(session_id)
    }

    /// Removes the session, returning the user that was bound to it.
    pub fn logout(&self, session_id: &str) -> Option<UserInfo> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
    }

    /// Removes every session and returns their ids.
    pub fn clear(&self) -> Vec<String> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(session_id, _)| session_id)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
