//! Peer directory, denylists, and selection.

mod denylist;
mod directory;
mod select;

pub use denylist::Denylist;
pub use directory::{PeerCapabilities, PeerDirectory, PeerEntry, PeerSnapshot};
pub use select::{PeerSelector, SelectionStrategy, UniformRandom};
