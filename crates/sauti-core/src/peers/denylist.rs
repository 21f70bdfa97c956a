//! Static peer exclusion sets.

use crate::error::{Error, Result};
use crate::peers::PeerEntry;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Identities excluded from selection regardless of capability.
///
/// Built once at startup and handed to the selector by value; nothing mutates
/// it afterwards, so concurrent reads need no synchronization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Denylist {
    #[serde(default)]
    pub coldkeys: HashSet<String>,
    #[serde(default)]
    pub hotkeys: HashSet<String>,
    #[serde(default)]
    pub validators: HashSet<String>,
}

impl Denylist {
    /// Load from a JSON file of the shape
    /// `{"coldkeys": [...], "hotkeys": [...], "validators": [...]}`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::Internal(format!("Malformed denylist file {}: {}", path.display(), e))
        })
    }

    pub fn excludes(&self, peer: &PeerEntry) -> bool {
        self.coldkeys.contains(&peer.coldkey)
            || self.hotkeys.contains(&peer.hotkey)
            || self.validators.contains(&peer.hotkey)
    }

    pub fn len(&self) -> usize {
        self.coldkeys.len() + self.hotkeys.len() + self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::PeerCapabilities;
    use std::io::Write;

    fn peer(hotkey: &str, coldkey: &str) -> PeerEntry {
        PeerEntry {
            uid: 1,
            address: "10.0.0.1:9000".into(),
            hotkey: hotkey.into(),
            coldkey: coldkey.into(),
            capabilities: PeerCapabilities::all(),
        }
    }

    #[test]
    fn excludes_by_either_identity() {
        let denylist = Denylist {
            coldkeys: ["cold-bad".to_string()].into(),
            hotkeys: ["hot-bad".to_string()].into(),
            validators: HashSet::new(),
        };

        assert!(denylist.excludes(&peer("hot-bad", "cold-ok")));
        assert!(denylist.excludes(&peer("hot-ok", "cold-bad")));
        assert!(!denylist.excludes(&peer("hot-ok", "cold-ok")));
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"hotkeys": ["h1", "h2"]}}"#).expect("write");

        let denylist = Denylist::from_file(file.path()).expect("load");
        assert_eq!(denylist.len(), 2);
        assert!(denylist.excludes(&peer("h1", "c")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        assert!(Denylist::from_file(file.path()).is_err());
    }
}
