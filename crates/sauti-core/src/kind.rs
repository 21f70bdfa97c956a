//! Generation service kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three brokered generation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    TextToSpeech,
    TextToMusic,
    VoiceClone,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [
        ServiceKind::TextToSpeech,
        ServiceKind::TextToMusic,
        ServiceKind::VoiceClone,
    ];

    /// Short wire/protocol code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceKind::TextToSpeech => "TTS",
            ServiceKind::TextToMusic => "TTM",
            ServiceKind::VoiceClone => "VC",
        }
    }

    /// Human-readable service name used in client-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKind::TextToSpeech => "Text-to-Speech",
            ServiceKind::TextToMusic => "Text-to-Music",
            ServiceKind::VoiceClone => "Voice Clone",
        }
    }

    /// Response header carrying the UID of the peer that served the request.
    pub fn uid_header(&self) -> &'static str {
        match self {
            ServiceKind::TextToSpeech => "TTS-Axon-UID",
            ServiceKind::TextToMusic => "TTM-Axon-UID",
            ServiceKind::VoiceClone => "VC-Axon-UID",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_headers_line_up() {
        assert_eq!(ServiceKind::TextToSpeech.uid_header(), "TTS-Axon-UID");
        assert_eq!(ServiceKind::TextToMusic.uid_header(), "TTM-Axon-UID");
        assert_eq!(ServiceKind::VoiceClone.uid_header(), "VC-Axon-UID");
        for kind in ServiceKind::ALL {
            assert!(kind.uid_header().starts_with(kind.code()));
        }
    }
}
