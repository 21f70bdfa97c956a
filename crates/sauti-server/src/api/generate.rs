//! Shared generation pipeline plumbing for the service endpoints.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    http::{header, Response},
};
use chrono::Utc;
use sauti_core::{
    AccessGate, Account, ArtifactDescriptor, ArtifactResolver, GenerationJob, ServiceKind,
};
use tracing::info;

/// Run the full text pipeline for one request:
/// authorize -> snapshot -> select -> dispatch -> resolve.
pub(crate) async fn run_text_pipeline(
    state: &AppState,
    account: &Account,
    kind: ServiceKind,
    prompt: &str,
) -> Result<ArtifactDescriptor, sauti_core::Error> {
    AccessGate::authorize(account, kind, Utc::now())?;
    info!(
        username = %account.username,
        "{} request authorized, {} chars",
        kind.code(),
        prompt.len()
    );

    let snapshot = state.directory.snapshot().await;
    let peer = state.selector.select(&snapshot, kind)?;

    let job = GenerationJob::text(kind, prompt);
    let raw = state.coordinator.dispatch(&peer, &job).await?;

    ArtifactResolver::resolve(state.processor.as_ref(), &peer, &raw, prompt).await
}

/// Stream the artifact back with its content type, a download file name, and
/// the serving peer's UID in the per-kind header.
pub(crate) async fn artifact_response(
    descriptor: &ArtifactDescriptor,
    kind: ServiceKind,
) -> Result<Response<Body>, ApiError> {
    let bytes = tokio::fs::read(&descriptor.path).await.map_err(|_| {
        ApiError::not_found(format!(
            "Artifact missing for uid {}",
            descriptor.peer_uid
        ))
    })?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, descriptor.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", descriptor.file_name),
        )
        .header(kind.uid_header(), descriptor.peer_uid.to_string())
        .body(Body::from(bytes))
        .unwrap())
}
