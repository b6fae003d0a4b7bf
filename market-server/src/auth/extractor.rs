//! Session Extractor
//!
//! Custom extractor for automatically validating session tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, SessionLookup, extract_bearer};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Session Auth Extractor
///
/// Use this extractor in protected handlers to automatically validate the
/// bearer token and extract CurrentUser
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => extract_bearer(header)
                .ok_or_else(|| AppError::validation("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        match state.sessions.get(token).await {
            SessionLookup::Found(session) => {
                let user = CurrentUser::from(&session);
                // Store in extensions for potential reuse
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            SessionLookup::Expired => {
                security_log!("WARN", "session_expired", uri = format!("{:?}", parts.uri));
                Err(AppError::session_expired())
            }
            SessionLookup::Missing => {
                security_log!("WARN", "auth_failed", uri = format!("{:?}", parts.uri));
                Err(AppError::invalid_token())
            }
        }
    }
}
