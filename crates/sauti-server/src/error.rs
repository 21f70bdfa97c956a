//! API error handling.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Challenge the client with `WWW-Authenticate: Bearer`. Set on
    /// authentication failures, not on entitlement denials.
    pub bearer_challenge: bool,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            bearer_challenge: false,
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
            bearer_challenge: false,
        }
    }

    pub fn unauthorized_bearer(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
            bearer_challenge: true,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
            bearer_challenge: false,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
            bearer_challenge: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "type": match self.status {
                    StatusCode::BAD_REQUEST => "invalid_request_error",
                    StatusCode::UNAUTHORIZED => "authentication_error",
                    StatusCode::NOT_FOUND => "not_found_error",
                    _ => "server_error",
                },
                "code": self.status.as_str()
            }
        }));

        let mut response = (self.status, body).into_response();
        if self.bearer_challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, "Bearer".parse().expect("header"));
        }
        response
    }
}

impl From<sauti_core::Error> for ApiError {
    fn from(err: sauti_core::Error) -> Self {
        use sauti_core::Error;

        match &err {
            Error::Validation(_) => ApiError::bad_request(err.to_string()),
            Error::AuthenticationFailed => ApiError::unauthorized_bearer(err.to_string()),
            Error::NoRoleAssigned { .. }
            | Error::SubscriptionExpired { .. }
            | Error::CapabilityDisabled { .. } => ApiError::unauthorized(err.to_string()),
            Error::ArtifactResolutionFailed { .. } => ApiError::not_found(err.to_string()),
            Error::NoPeersAvailable(_)
            | Error::PeerQueryFailed { .. }
            | Error::UnsupportedArtifactFormat(_) => ApiError::internal(err.to_string()),
            Error::Io(_) | Error::Internal(_) => {
                // Unexpected server-side failure: log the detail, return a
                // generic message.
                tracing::error!("internal error: {err}");
                ApiError::internal("Internal Server Error. Check the server logs for more details.")
            }
        }
    }
}
