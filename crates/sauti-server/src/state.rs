//! Shared application state.

use crate::token::TokenSigner;
use sauti_core::{
    AccountStore, DispatchCoordinator, GatewayConfig, MediaProcessor, PeerDirectory, PeerSelector,
};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Clone-cheap shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub directory: PeerDirectory,
    pub selector: Arc<PeerSelector>,
    pub coordinator: Arc<DispatchCoordinator>,
    pub processor: Arc<dyn MediaProcessor>,
    pub tokens: Arc<TokenSigner>,
    /// Concurrency limiter to prevent resource exhaustion.
    pub request_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        accounts: Arc<dyn AccountStore>,
        directory: PeerDirectory,
        selector: PeerSelector,
        coordinator: DispatchCoordinator,
        processor: Arc<dyn MediaProcessor>,
    ) -> Self {
        let tokens = TokenSigner::new(config.auth_secret.clone(), config.token_ttl_secs);
        let request_semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests));

        Self {
            config: Arc::new(config),
            accounts,
            directory,
            selector: Arc::new(selector),
            coordinator: Arc::new(coordinator),
            processor,
            tokens: Arc::new(tokens),
            request_semaphore,
        }
    }

    /// Acquire a permit for concurrent request processing.
    pub async fn acquire_permit(&self) -> tokio::sync::SemaphorePermit<'_> {
        self.request_semaphore
            .acquire()
            .await
            .expect("Semaphore should never be closed")
    }
}
