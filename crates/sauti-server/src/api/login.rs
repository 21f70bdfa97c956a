//! Login endpoint: dual-domain credential resolution plus token issuance.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Form, Json};
use chrono::Utc;
use sauti_core::DualCredentialAuthenticator;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (principal, _account) =
        DualCredentialAuthenticator::resolve(state.accounts.as_ref(), &form.username, &form.password)
            .await
            .map_err(|_| ApiError::unauthorized_bearer("Incorrect username or password"))?;

    info!(username = %principal.username, domain = ?principal.domain, "login succeeded");

    let access_token = state.tokens.issue(&principal, Utc::now());
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
