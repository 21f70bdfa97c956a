//! Job dispatch to a selected peer.

use crate::audio::VoiceSample;
use crate::error::{Error, Result};
use crate::kind::ServiceKind;
use crate::peers::PeerEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// One generation job bound for a peer.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: String,
    pub kind: ServiceKind,
    pub prompt: String,
    /// Decoded input audio; present only for voice cloning.
    pub sample: Option<VoiceSample>,
}

impl GenerationJob {
    pub fn text(kind: ServiceKind, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            prompt: prompt.into(),
            sample: None,
        }
    }

    pub fn voice_clone(prompt: impl Into<String>, sample: VoiceSample) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: ServiceKind::VoiceClone,
            prompt: prompt.into(),
            sample: Some(sample),
        }
    }
}

/// Raw reply from a peer, prior to artifact materialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl RawResponse {
    pub fn is_empty(&self) -> bool {
        self.audio_base64
            .as_deref()
            .map(|audio| audio.trim().is_empty())
            .unwrap_or(true)
    }
}

/// The media-processing collaborator: owns the peer wire protocol and the
/// conversion of a raw reply into a locally resolvable artifact.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Send the job to the peer and await its reply.
    async fn query(&self, peer: &PeerEntry, job: &GenerationJob) -> Result<RawResponse>;

    /// Turn a raw reply into an artifact on the local filesystem.
    async fn materialize(&self, peer: &PeerEntry, raw: &RawResponse, prompt: &str)
        -> Result<PathBuf>;
}

/// Runs the deadline-bounded network leg of the pipeline.
pub struct DispatchCoordinator {
    processor: Arc<dyn MediaProcessor>,
    deadline: Duration,
}

impl DispatchCoordinator {
    pub fn new(processor: Arc<dyn MediaProcessor>, deadline: Duration) -> Self {
        Self { processor, deadline }
    }

    /// Dispatch the job to the chosen peer and await its reply.
    ///
    /// Transport failures, deadline expiry, and absent or empty replies all
    /// collapse to `PeerQueryFailed`. The coordinator never switches peers:
    /// a retry is a fresh `select` + `dispatch` round owned by the caller.
    pub async fn dispatch(&self, peer: &PeerEntry, job: &GenerationJob) -> Result<RawResponse> {
        info!(
            uid = peer.uid,
            job = %job.id,
            "dispatching {} job to {}",
            job.kind.code(),
            peer.address
        );

        let outcome = tokio::time::timeout(self.deadline, self.processor.query(peer, job)).await;

        let reply = match outcome {
            Err(_) => {
                warn!(uid = peer.uid, job = %job.id, "peer query deadline exceeded");
                return Err(Error::PeerQueryFailed {
                    uid: peer.uid,
                    reason: format!("no reply within {}s", self.deadline.as_secs()),
                });
            }
            Ok(Err(Error::PeerQueryFailed { uid, reason })) => {
                return Err(Error::PeerQueryFailed { uid, reason })
            }
            Ok(Err(other)) => {
                return Err(Error::PeerQueryFailed {
                    uid: peer.uid,
                    reason: other.to_string(),
                })
            }
            Ok(Ok(reply)) => reply,
        };

        if reply.is_empty() {
            return Err(Error::PeerQueryFailed {
                uid: peer.uid,
                reason: "empty reply".to_string(),
            });
        }

        Ok(reply)
    }
}
