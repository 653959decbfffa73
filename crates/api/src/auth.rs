// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sessions and credential checks.

use std::collections::BTreeMap;

use tracing::warn;

/// The request layer's view of a client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DalSession {
    pub session_id: String,
    /// Group resolved by the request layer; echoed in group info.
    pub group_id: String,
}

impl DalSession {
    #[must_use]
    pub fn new(session_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            group_id: group_id.into(),
        }
    }
}

/// How long the request layer keeps a session alive. The adapter only
/// records it; expiry is enforced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionExpiryOption {
    #[default]
    AutoExpire,
    NoAutoExpire,
}

/// Decides whether the credentials supplied at login match the stored ones.
pub trait CredentialCheck: Send + Sync {
    /// `stored` is the credential column of the matching user row; `params`
    /// are the extra login parameters supplied by the client.
    fn verify(&self, user_name: &str, stored: Option<&str>, params: &BTreeMap<String, String>)
    -> bool;
}

impl<F> CredentialCheck for F
where
    F: Fn(&str, Option<&str>, &BTreeMap<String, String>) -> bool + Send + Sync,
{
    fn verify(
        &self,
        user_name: &str,
        stored: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> bool {
        self(user_name, stored, params)
    }
}

/// Login parameter that carries the password.
pub const PASSWORD_PARAM: &str = "password";

/// Compares the `password` parameter with the stored credential.
///
/// Stored values that look like bcrypt hashes are verified with bcrypt;
/// anything else must match exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCheck;

impl CredentialCheck for PasswordCheck {
    fn verify(
        &self,
        user_name: &str,
        stored: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> bool {
        let (Some(stored), Some(supplied)) = (stored, params.get(PASSWORD_PARAM)) else {
            return false;
        };

        if stored.starts_with("$2") {
            bcrypt::verify(supplied, stored).unwrap_or_else(|e| {
                warn!(user_name, error = %e, "Stored bcrypt hash is malformed");
                false
            })
        } else {
            stored == supplied
        }
    }
}
