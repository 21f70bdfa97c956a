//! Text-to-music service endpoint.

use crate::api::generate::{artifact_response, run_text_pipeline};
use crate::api::tts::PromptRequest;
use crate::api::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{body::Body, extract::State, http::Response, Json};
use sauti_core::ServiceKind;

pub async fn ttm_service(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<PromptRequest>,
) -> Result<Response<Body>, ApiError> {
    let _permit = state.acquire_permit().await;

    let descriptor = match run_text_pipeline(
        &state,
        &user.account,
        ServiceKind::TextToMusic,
        &request.prompt,
    )
    .await
    {
        // This route reports an empty pool as 404, unlike its siblings.
        Err(err @ sauti_core::Error::NoPeersAvailable(_)) => {
            return Err(ApiError::not_found(err.to_string()))
        }
        other => other.map_err(ApiError::from)?,
    };

    artifact_response(&descriptor, ServiceKind::TextToMusic).await
}
