//! API routes and handlers.

mod generate;
mod guard;
mod health;
mod login;
mod password;
mod tts;
mod ttm;
mod vc;

pub use guard::CurrentUser;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authentication
        .route("/login", post(login::login))
        .route("/change_password", post(password::change_password))
        // Generation services
        .route("/tts_service", post(tts::tts_service))
        .route("/ttm_service", post(ttm::ttm_service))
        .route("/vc_service", post(vc::vc_service))
        // Voice uploads can be sizeable
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
