//! Error taxonomy for the dispatch pipeline.

use crate::kind::ServiceKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// One variant per client-meaningful failure class. The embedding server maps
/// these onto HTTP statuses; the pipeline itself never retries.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, or a policy violation.
    #[error("{0}")]
    Validation(String),

    #[error("Incorrect username or password")]
    AuthenticationFailed,

    #[error("{username}! You do not have any roles assigned")]
    NoRoleAssigned { username: String },

    #[error("{username}! Your subscription has expired or is missing")]
    SubscriptionExpired { username: String },

    #[error("{username}! You do not have access to the {kind} service")]
    CapabilityDisabled {
        username: String,
        kind: ServiceKind,
    },

    #[error("No peers available for {0}")]
    NoPeersAvailable(ServiceKind),

    /// Transport failure, deadline expiry, or an absent/malformed peer reply.
    #[error("Peer query failed for uid {uid}: {reason}")]
    PeerQueryFailed { uid: u16, reason: String },

    #[error("Error processing audio artifact for uid {uid}: {reason}")]
    ArtifactResolutionFailed { uid: u16, reason: String },

    #[error("Unsupported audio format: {0}")]
    UnsupportedArtifactFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected failures; never shown verbatim to clients.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Whether the failure should be attributed to the client request rather
    /// than the gateway or the peer pool.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::AuthenticationFailed
                | Error::NoRoleAssigned { .. }
                | Error::SubscriptionExpired { .. }
                | Error::CapabilityDisabled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_user() {
        let err = Error::SubscriptionExpired {
            username: "amina".into(),
        };
        assert!(err.to_string().contains("amina"));
        assert!(err.to_string().contains("expired"));

        let err = Error::CapabilityDisabled {
            username: "amina".into(),
            kind: ServiceKind::TextToMusic,
        };
        assert!(err.to_string().contains("Text-to-Music"));
    }

    #[test]
    fn fault_attribution() {
        assert!(Error::AuthenticationFailed.is_client_fault());
        assert!(!Error::NoPeersAvailable(ServiceKind::VoiceClone).is_client_fault());
        assert!(!Error::PeerQueryFailed {
            uid: 7,
            reason: "timeout".into()
        }
        .is_client_fault());
    }
}
