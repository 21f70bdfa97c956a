//! Artifact validation and format mapping.

use crate::dispatch::{MediaProcessor, RawResponse};
use crate::error::{Error, Result};
use crate::peers::PeerEntry;
use std::path::{Path, PathBuf};
use tracing::info;

/// Servable audio formats, derived from the artifact's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Extension-to-format mapping, case-insensitive. Anything other than
    /// `.wav` or `.mp3` (including a missing extension) is unsupported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("wav") => Ok(AudioFormat::Wav),
            Some("mp3") => Ok(AudioFormat::Mp3),
            Some(other) => Err(Error::UnsupportedArtifactFormat(format!(".{other}"))),
            None => Err(Error::UnsupportedArtifactFormat("(none)".to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

/// A validated, servable artifact.
#[derive(Debug, Clone)]
pub struct ArtifactDescriptor {
    pub path: PathBuf,
    pub format: AudioFormat,
    /// Display name offered to the client, the artifact's file name.
    pub file_name: String,
    /// UID of the peer that produced the artifact, surfaced as response
    /// metadata.
    pub peer_uid: u16,
}

impl ArtifactDescriptor {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Validates a raw peer reply into a servable artifact descriptor.
pub struct ArtifactResolver;

impl ArtifactResolver {
    /// Materialize the reply through the media processor and validate the
    /// result. No side effects beyond the processor's own file write.
    pub async fn resolve(
        processor: &dyn MediaProcessor,
        peer: &PeerEntry,
        raw: &RawResponse,
        prompt: &str,
    ) -> Result<ArtifactDescriptor> {
        let path = processor
            .materialize(peer, raw, prompt)
            .await
            .map_err(|e| Error::ArtifactResolutionFailed {
                uid: peer.uid,
                reason: e.to_string(),
            })?;

        if path.as_os_str().is_empty() {
            return Err(Error::ArtifactResolutionFailed {
                uid: peer.uid,
                reason: "empty artifact path".to_string(),
            });
        }

        let format = AudioFormat::from_path(&path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact")
            .to_string();

        info!(
            uid = peer.uid,
            "resolved artifact {} ({})",
            path.display(),
            format.content_type()
        );

        Ok(ArtifactDescriptor {
            path,
            format,
            file_name,
            peer_uid: peer.uid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::GenerationJob;
    use crate::peers::PeerCapabilities;
    use async_trait::async_trait;

    fn peer() -> PeerEntry {
        PeerEntry {
            uid: 7,
            address: "10.0.0.7:9000".into(),
            hotkey: "hot-7".into(),
            coldkey: "cold-7".into(),
            capabilities: PeerCapabilities::all(),
        }
    }

    struct FixedPath(&'static str);

    #[async_trait]
    impl MediaProcessor for FixedPath {
        async fn query(
            &self,
            _peer: &PeerEntry,
            _job: &GenerationJob,
        ) -> crate::Result<RawResponse> {
            Ok(RawResponse::default())
        }

        async fn materialize(
            &self,
            _peer: &PeerEntry,
            _raw: &RawResponse,
            _prompt: &str,
        ) -> crate::Result<PathBuf> {
            if self.0.is_empty() {
                Err(Error::Internal("processing failed".to_string()))
            } else {
                Ok(PathBuf::from(self.0))
            }
        }
    }

    #[test]
    fn content_type_mapping_is_total_and_exact() {
        assert_eq!(
            AudioFormat::from_path(Path::new("clip.wav")).unwrap().content_type(),
            "audio/wav"
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("CLIP.MP3")).unwrap().content_type(),
            "audio/mpeg"
        );
        assert!(matches!(
            AudioFormat::from_path(Path::new("clip.ogg")),
            Err(Error::UnsupportedArtifactFormat(_))
        ));
        assert!(matches!(
            AudioFormat::from_path(Path::new("clip")),
            Err(Error::UnsupportedArtifactFormat(_))
        ));
    }

    #[tokio::test]
    async fn descriptor_carries_peer_uid_and_display_name() {
        let raw = RawResponse {
            audio_base64: Some("UklGRg==".into()),
            format: Some("wav".into()),
        };

        let descriptor = ArtifactResolver::resolve(&FixedPath("out/clip.wav"), &peer(), &raw, "hello")
            .await
            .expect("resolves");
        assert_eq!(descriptor.peer_uid, 7);
        assert_eq!(descriptor.file_name, "clip.wav");
        assert_eq!(descriptor.content_type(), "audio/wav");
    }

    #[tokio::test]
    async fn processor_failure_maps_to_resolution_failure() {
        let raw = RawResponse::default();
        let err = ArtifactResolver::resolve(&FixedPath(""), &peer(), &raw, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactResolutionFailed { uid: 7, .. }));
    }

    #[tokio::test]
    async fn unsupported_extension_fails_resolution() {
        let raw = RawResponse::default();
        let err = ArtifactResolver::resolve(&FixedPath("clip.flac"), &peer(), &raw, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedArtifactFormat(_)));
    }
}
