//! Eligible-peer filtering and selection.

use crate::error::{Error, Result};
use crate::kind::ServiceKind;
use crate::peers::{Denylist, PeerEntry, PeerSnapshot};
use rand::Rng;
use tracing::debug;

/// Picks one peer from an already-filtered, non-empty pool.
///
/// Must be total over any non-empty slice. Uniform randomness is the default
/// policy; alternatives (score-weighted, round-robin) slot in here without
/// touching the filter.
pub trait SelectionStrategy: Send + Sync {
    fn choose<'a>(&self, eligible: &'a [PeerEntry]) -> &'a PeerEntry;
}

/// Every eligible peer is equally likely.
#[derive(Debug, Default)]
pub struct UniformRandom;

impl SelectionStrategy for UniformRandom {
    fn choose<'a>(&self, eligible: &'a [PeerEntry]) -> &'a PeerEntry {
        let idx = rand::thread_rng().gen_range(0..eligible.len());
        &eligible[idx]
    }
}

/// Filters a directory snapshot and selects exactly one peer per call.
pub struct PeerSelector {
    denylist: Denylist,
    strategy: Box<dyn SelectionStrategy>,
}

impl PeerSelector {
    pub fn new(denylist: Denylist) -> Self {
        Self::with_strategy(denylist, Box::new(UniformRandom))
    }

    pub fn with_strategy(denylist: Denylist, strategy: Box<dyn SelectionStrategy>) -> Self {
        Self { denylist, strategy }
    }

    /// Peers advertising the capability and absent from every denylist.
    /// Denylist and capability filtering happen before any randomization.
    pub fn eligible(&self, snapshot: &PeerSnapshot, kind: ServiceKind) -> Vec<PeerEntry> {
        snapshot
            .peers
            .iter()
            .filter(|peer| peer.capabilities.supports(kind) && !self.denylist.excludes(peer))
            .cloned()
            .collect()
    }

    /// Select one peer for `kind`, or fail with `NoPeersAvailable`.
    ///
    /// An empty filtered set fails immediately; no network call has happened
    /// yet at this stage and none is attempted. There is no retry here: a
    /// fresh `select` is a separate operation the caller owns.
    pub fn select(&self, snapshot: &PeerSnapshot, kind: ServiceKind) -> Result<PeerEntry> {
        let eligible = self.eligible(snapshot, kind);
        if eligible.is_empty() {
            return Err(Error::NoPeersAvailable(kind));
        }

        let chosen = self.strategy.choose(&eligible).clone();
        debug!(
            uid = chosen.uid,
            pool = eligible.len(),
            version = snapshot.version,
            "selected {} peer",
            kind.code()
        );
        Ok(chosen)
    }
}
