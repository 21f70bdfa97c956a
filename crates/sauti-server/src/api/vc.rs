//! Voice-clone service endpoint.

use crate::api::generate::artifact_response;
use crate::api::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::Response,
};
use chrono::Utc;
use sauti_core::{
    AccessGate, ArtifactResolver, GenerationJob, ServiceKind, SpooledUpload,
};
use tracing::info;

pub async fn vc_service(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<Response<Body>, ApiError> {
    let _permit = state.acquire_permit().await;

    let (prompt, audio_bytes) = parse_vc_request(multipart).await?;

    if prompt.trim_matches('"').trim().is_empty() {
        return Err(ApiError::bad_request("Prompt section cannot be empty."));
    }
    let audio_bytes = match audio_bytes {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(ApiError::bad_request("Audio file is required.")),
    };
    let prompt = quote_prompt(prompt);

    AccessGate::authorize(&user.account, ServiceKind::VoiceClone, Utc::now())
        .map_err(ApiError::from)?;
    info!(username = %user.account.username, "VC request authorized");

    let snapshot = state.directory.snapshot().await;
    let peer = state
        .selector
        .select(&snapshot, ServiceKind::VoiceClone)
        .map_err(ApiError::from)?;

    // Spool the upload into a scoped temp file and decode it off the async
    // runtime. The guard lives until the end of the handler, so the file is
    // removed on success and on every failure path.
    let spooled = tokio::task::spawn_blocking(move || SpooledUpload::spool(&audio_bytes))
        .await
        .map_err(|e| ApiError::internal(format!("Audio decode task failed: {e}")))?
        .map_err(ApiError::from)?;

    let job = GenerationJob::voice_clone(prompt.clone(), spooled.sample.clone());
    let raw = state
        .coordinator
        .dispatch(&peer, &job)
        .await
        .map_err(|err| match err {
            e @ sauti_core::Error::PeerQueryFailed { .. } => {
                ApiError::internal(format!("Error generating voice clone: {e}"))
            }
            other => ApiError::from(other),
        })?;

    let descriptor = ArtifactResolver::resolve(state.processor.as_ref(), &peer, &raw, &prompt)
        .await
        .map_err(ApiError::from)?;

    drop(spooled);
    artifact_response(&descriptor, ServiceKind::VoiceClone).await
}

/// Pull `prompt` and `audio_file` out of the multipart body.
async fn parse_vc_request(mut multipart: Multipart) -> Result<(String, Option<Vec<u8>>), ApiError> {
    let mut prompt = String::new();
    let mut audio_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" => {
                prompt = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading multipart 'prompt' field: {e}"))
                })?;
            }
            "audio_file" => {
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!(
                        "Failed reading multipart 'audio_file' field: {e}"
                    ))
                })?;
                audio_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    Ok((prompt, audio_bytes))
}

/// Peers expect the clone text enclosed in double quotes.
fn quote_prompt(prompt: String) -> String {
    if prompt.starts_with('"') && prompt.ends_with('"') && prompt.len() >= 2 {
        prompt
    } else {
        format!("\"{prompt}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_unquoted_prompts_only() {
        assert_eq!(quote_prompt("hello there".into()), "\"hello there\"");
        assert_eq!(quote_prompt("\"hello there\"".into()), "\"hello there\"");
        assert_eq!(quote_prompt("\"".into()), "\"\"\"");
    }
}
