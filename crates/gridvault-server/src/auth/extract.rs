use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Key, SignedCookieJar};

use super::session::{SessionRecord, SESSION_COOKIE};
use crate::error::AppError;
use crate::AppState;

/// Session attached to the request, if the signed cookie names a live one
///
/// A missing, tampered, unknown or expired cookie all resolve to `None`.
/// The lookup result is cached in the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionRecord>);

impl CurrentSession {
    pub fn record(&self) -> Option<&SessionRecord> {
        self.0.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.0.is_some()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentSession>() {
            return Ok(cached.clone());
        }

        let jar = SignedCookieJar::<Key>::from_headers(&parts.headers, state.cookie_key.clone());
        let session = match jar.get(SESSION_COOKIE) {
            Some(cookie) => state.sessions.resolve(cookie.value()).await?,
            None => None,
        };

        let current = CurrentSession(session);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
