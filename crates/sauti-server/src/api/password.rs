//! Password change endpoint.

use crate::api::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Form, Json};
use sauti_core::{auth::password::validate_new_password, AccountDomain};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_new_password: String,
}

/// Checks run in a fixed order so clients get the most specific failure:
/// field presence, account existence, current credentials, confirmation
/// match, novelty, then the composite policy.
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Json<Value>, ApiError> {
    tracing::debug!(requested_by = %user.principal.username, "password change requested");

    if form.username.trim().is_empty()
        || form.current_password.is_empty()
        || form.new_password.is_empty()
        || form.confirm_new_password.is_empty()
    {
        error!("All fields are required.");
        return Err(ApiError::bad_request("All fields are required."));
    }

    if state.accounts.find(&form.username).await.is_none() {
        error!("User not found.");
        return Err(ApiError::not_found("User not found"));
    }

    if state
        .accounts
        .verify(&form.username, &form.current_password, AccountDomain::User)
        .await
        .is_none()
    {
        error!("Invalid credentials.");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if form.new_password != form.confirm_new_password {
        error!("New password and confirm new password do not match.");
        return Err(ApiError::bad_request(
            "New password and confirm new password do not match.",
        ));
    }

    if form.current_password == form.new_password {
        error!("New password must be different from the current password.");
        return Err(ApiError::bad_request(
            "New password must be different from the current password.",
        ));
    }

    validate_new_password(&form.new_password).map_err(ApiError::from)?;

    if state
        .accounts
        .update_password(&form.username, &form.new_password)
        .await
        .is_none()
    {
        error!("Failed to update password.");
        return Err(ApiError::internal("Failed to update password."));
    }

    info!(username = %form.username, "password changed");
    Ok(Json(json!({ "message": "Password changed successfully" })))
}
