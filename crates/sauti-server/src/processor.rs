//! HTTP media processor: the peer wire protocol and artifact writes.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sauti_core::{Error, GenerationJob, MediaProcessor, PeerEntry, RawResponse, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Body POSTed to a peer's `/generate` endpoint.
#[derive(Debug, Serialize)]
struct PeerJobRequest<'a> {
    kind: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    waveform: Option<&'a [f32]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate: Option<u32>,
}

/// Reply a peer sends back.
#[derive(Debug, Deserialize)]
struct PeerJobReply {
    #[serde(default)]
    audio_base64: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

/// Queries peers over HTTP and writes artifacts under a local directory.
pub struct HttpMediaProcessor {
    client: reqwest::Client,
    artifacts_dir: PathBuf,
}

impl HttpMediaProcessor {
    pub fn new(artifacts_dir: PathBuf, request_timeout: Duration) -> Result<Self> {
        std::fs::create_dir_all(&artifacts_dir)?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            artifacts_dir,
        })
    }

    fn endpoint(peer: &PeerEntry) -> String {
        format!("http://{}/generate", peer.address)
    }
}

#[async_trait]
impl MediaProcessor for HttpMediaProcessor {
    async fn query(&self, peer: &PeerEntry, job: &GenerationJob) -> Result<RawResponse> {
        let body = PeerJobRequest {
            kind: job.kind.code(),
            prompt: &job.prompt,
            waveform: job.sample.as_ref().map(|s| s.waveform.as_slice()),
            sample_rate: job.sample.as_ref().map(|s| s.sample_rate),
        };

        let response = self
            .client
            .post(Self::endpoint(peer))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::PeerQueryFailed {
                uid: peer.uid,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::PeerQueryFailed {
                uid: peer.uid,
                reason: format!("peer answered {}", response.status()),
            });
        }

        let reply: PeerJobReply = response.json().await.map_err(|e| Error::PeerQueryFailed {
            uid: peer.uid,
            reason: format!("malformed reply: {e}"),
        })?;

        Ok(RawResponse {
            audio_base64: reply.audio_base64,
            format: reply.format,
        })
    }

    async fn materialize(
        &self,
        peer: &PeerEntry,
        raw: &RawResponse,
        _prompt: &str,
    ) -> Result<PathBuf> {
        let encoded = raw
            .audio_base64
            .as_deref()
            .ok_or_else(|| Error::Internal("peer reply carried no audio".to_string()))?;

        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| Error::Internal(format!("undecodable audio payload: {e}")))?;

        // The extension the peer claims; resolution decides whether it is
        // actually servable.
        let extension = raw
            .format
            .as_deref()
            .unwrap_or("wav")
            .trim_start_matches('.')
            .to_ascii_lowercase();

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.artifacts_dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;

        debug!(
            uid = peer.uid,
            "wrote {} byte artifact to {}",
            bytes.len(),
            path.display()
        );
        Ok(path)
    }
}
