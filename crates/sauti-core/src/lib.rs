//! Sauti Core - request dispatch pipeline for brokered media generation
//!
//! This crate implements the pipeline that takes an authenticated generation
//! request (text-to-speech, text-to-music, voice cloning) and turns it into a
//! servable audio artifact produced by a worker peer on a decentralized
//! compute network:
//!
//! ```text
//! authorize -> select peer -> dispatch -> resolve artifact
//! ```
//!
//! Each stage is a small component with an explicit contract: [`AccessGate`]
//! decides entitlement, [`PeerSelector`] picks one eligible peer from a
//! directory snapshot, [`DispatchCoordinator`] runs the deadline-bounded peer
//! query, and [`ArtifactResolver`] validates the produced artifact. External
//! collaborators (account storage, the peer wire protocol, artifact
//! materialization) sit behind the [`AccountStore`] and [`MediaProcessor`]
//! traits and are supplied by the embedding server.

pub mod access;
pub mod artifact;
pub mod audio;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod peers;

pub use access::{AccessGate, Account, Role};
pub use artifact::{ArtifactDescriptor, ArtifactResolver, AudioFormat};
pub use audio::{SpooledUpload, VoiceSample};
pub use auth::{
    AccountDomain, AccountStore, CredentialMatch, DualCredentialAuthenticator, Principal,
};
pub use config::GatewayConfig;
pub use dispatch::{DispatchCoordinator, GenerationJob, MediaProcessor, RawResponse};
pub use error::{Error, Result};
pub use kind::ServiceKind;
pub use peers::{
    Denylist, PeerCapabilities, PeerDirectory, PeerEntry, PeerSelector, PeerSnapshot,
    SelectionStrategy, UniformRandom,
};
