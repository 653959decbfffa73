// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

/// The identity bound to a session after a successful login.
///
/// Besides the name and id, the legacy profile fields from the `users`
/// table are retained so that group information can be derived later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub user_name: String,
    pub user_id: String,
    pub installation_id: i32,
    pub status: i32,
    pub access: i32,
    /// Legacy user type code, resolved through the user type table.
    pub type_code: i32,
    pub person_id: i32,
    pub access_date: Option<String>,
}

/// Group membership information for the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemGroupInfo {
    pub group_id: String,
    pub group_name: String,
    pub group_owner: bool,
}

impl SystemGroupInfo {
    #[must_use]
    pub const fn is_group_owner(&self) -> bool {
        self.group_owner
    }
}
