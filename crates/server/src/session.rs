// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Clients present the session id returned by `POST /login` as
//! `Authorization: Bearer <session id>`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use bms_interop_api::DalSession;
use bms_interop_domain::UserInfo;
use tracing::{debug, warn};

use crate::AppState;

/// The raw session id from the Authorization header, whether or not it is
/// logged in.
pub struct SessionToken(pub String);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header does not carry a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        Ok(Self(token.to_string()))
    }
}

/// A logged-in session and its user.
///
/// The session's group id is the user's type code.
pub struct SessionUser(pub DalSession, pub UserInfo);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;

        let user = state.database.session_user(&token).ok_or_else(|| {
            debug!("Session is not logged in");
            SessionError::NotLoggedIn
        })?;

        debug!(user_name = %user.user_name, "Session validated");
        let session = DalSession::new(token, user.type_code.to_string());
        Ok(Self(session, user))
    }
}

#[derive(Debug)]
pub enum SessionError {
    MissingAuthorizationHeader,
    InvalidAuthorizationHeader,
    NotLoggedIn,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <session id>'"
            }
            Self::NotLoggedIn => "Session is not logged in",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}
