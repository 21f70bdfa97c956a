//! Bearer authentication extractor.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use sauti_core::{Account, Principal};

/// The authenticated requester, resolved from the `Authorization` header.
///
/// Verifies the bearer token and loads the account snapshot the pipeline
/// will authorize against. Missing or invalid credentials answer 401 with a
/// `WWW-Authenticate: Bearer` challenge.
pub struct CurrentUser {
    pub principal: Principal,
    pub account: Account,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized_bearer("Not authenticated"))?;

        let principal = state
            .tokens
            .verify(token, Utc::now())
            .map_err(|_| ApiError::unauthorized_bearer("Could not validate credentials"))?;

        let account = state
            .accounts
            .find(&principal.username)
            .await
            .ok_or_else(|| ApiError::unauthorized_bearer("Could not validate credentials"))?;

        Ok(Self { principal, account })
    }
}
