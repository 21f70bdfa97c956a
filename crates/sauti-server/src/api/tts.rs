//! Text-to-speech service endpoint.

use crate::api::generate::{artifact_response, run_text_pipeline};
use crate::api::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{body::Body, extract::State, http::Response, Json};
use sauti_core::ServiceKind;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

pub async fn tts_service(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<PromptRequest>,
) -> Result<Response<Body>, ApiError> {
    let _permit = state.acquire_permit().await;

    let descriptor = run_text_pipeline(
        &state,
        &user.account,
        ServiceKind::TextToSpeech,
        &request.prompt,
    )
    .await
    .map_err(ApiError::from)?;

    artifact_response(&descriptor, ServiceKind::TextToSpeech).await
}
