//! Peer directory refresh.
//!
//! The pool is synchronized by an external process; this module is the
//! gateway-side pull: fetch the peer list from a configured source on an
//! interval and publish each fetch as a fresh snapshot. The pipeline only
//! ever reads snapshots, never the source.

use async_trait::async_trait;
use sauti_core::{Error, PeerDirectory, PeerEntry, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Where the peer list comes from.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PeerEntry>>;
}

/// Fetches the peer list as JSON from a directory endpoint.
pub struct HttpDirectorySource {
    client: reqwest::Client,
    url: String,
}

impl HttpDirectorySource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch(&self) -> Result<Vec<PeerEntry>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("directory fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "directory endpoint answered {}",
                response.status()
            )));
        }

        response
            .json::<Vec<PeerEntry>>()
            .await
            .map_err(|e| Error::Internal(format!("malformed directory payload: {e}")))
    }
}

/// Spawn the refresh loop. The first tick fires immediately so the pool is
/// populated before the listener starts taking traffic in the common case;
/// a failed fetch leaves the previous snapshot in place.
pub fn spawn_directory_refresh(
    directory: PeerDirectory,
    source: Arc<dyn DirectorySource>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match source.fetch().await {
                Ok(peers) => {
                    let count = peers.len();
                    let version = directory.publish(peers).await;
                    debug!(version, count, "peer directory refreshed");
                }
                Err(err) => warn!("peer directory refresh failed: {err}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sauti_core::PeerCapabilities;

    struct Scripted {
        replies: tokio::sync::Mutex<Vec<Result<Vec<PeerEntry>>>>,
    }

    #[async_trait]
    impl DirectorySource for Scripted {
        async fn fetch(&self) -> Result<Vec<PeerEntry>> {
            self.replies
                .lock()
                .await
                .pop()
                .unwrap_or_else(|| Err(Error::Internal("script exhausted".into())))
        }
    }

    fn peer(uid: u16) -> PeerEntry {
        PeerEntry {
            uid,
            address: format!("10.0.0.{uid}:9000"),
            hotkey: format!("hot-{uid}"),
            coldkey: format!("cold-{uid}"),
            capabilities: PeerCapabilities::all(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_publishes_and_survives_fetch_failures() {
        let directory = PeerDirectory::new();
        // Popped back to front: first a good fetch, then a failure.
        let source = Arc::new(Scripted {
            replies: tokio::sync::Mutex::new(vec![
                Err(Error::Internal("network down".into())),
                Ok(vec![peer(1), peer(2)]),
            ]),
        });

        let handle = spawn_directory_refresh(
            directory.clone(),
            source,
            Duration::from_secs(60),
        );

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let snapshot = directory.snapshot().await;
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.peers.len(), 2);

        // Second tick fails; the previous snapshot stays.
        tokio::time::sleep(Duration::from_secs(61)).await;
        let snapshot = directory.snapshot().await;
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.peers.len(), 2);

        handle.abort();
    }
}
