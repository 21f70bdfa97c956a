//! Externally refreshed view of the worker peer pool.

use crate::kind::ServiceKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Capability tags a peer advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerCapabilities {
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub ttm: bool,
    #[serde(default)]
    pub vc: bool,
}

impl PeerCapabilities {
    pub fn all() -> Self {
        Self {
            tts: true,
            ttm: true,
            vc: true,
        }
    }

    pub fn supports(&self, kind: ServiceKind) -> bool {
        match kind {
            ServiceKind::TextToSpeech => self.tts,
            ServiceKind::TextToMusic => self.ttm,
            ServiceKind::VoiceClone => self.vc,
        }
    }
}

/// One known worker peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub uid: u16,
    /// Network address of the peer, `host:port`.
    pub address: String,
    #[serde(default)]
    pub hotkey: String,
    #[serde(default)]
    pub coldkey: String,
    #[serde(default)]
    pub capabilities: PeerCapabilities,
}

/// A consistent, possibly stale view of the pool at one refresh instant.
#[derive(Debug, Default)]
pub struct PeerSnapshot {
    pub version: u64,
    pub peers: Vec<PeerEntry>,
}

/// Shared handle to the current snapshot.
///
/// The refresh task is the only writer; the pipeline only ever reads whole
/// snapshots. A snapshot taken before dispatch may be stale by the time the
/// peer is queried; that staleness is accepted, not worked around.
#[derive(Clone, Default)]
pub struct PeerDirectory {
    inner: Arc<RwLock<Arc<PeerSnapshot>>>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Cheap: clones an `Arc`, never the peer list.
    pub async fn snapshot(&self) -> Arc<PeerSnapshot> {
        self.inner.read().await.clone()
    }

    /// Replace the pool with a freshly fetched peer list. Returns the new
    /// snapshot version.
    pub async fn publish(&self, peers: Vec<PeerEntry>) -> u64 {
        let mut slot = self.inner.write().await;
        let version = slot.version + 1;
        *slot = Arc::new(PeerSnapshot { version, peers });
        version
    }
}
