use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::GatewayError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// A completion that fails to parse is deliberately absent here: it is degraded
/// to a raw-text result, never turned into a failure status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{provider} unavailable: {reason}")]
    UpstreamUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} rejected the request (status {status:?}): {details}")]
    UpstreamRejected {
        provider: &'static str,
        status: Option<u16>,
        details: String,
    },

    #[error("Server not configured ({0} missing)")]
    ConfigurationMissing(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a gateway failure onto the caller-facing taxonomy.
    pub fn from_gateway(provider: &'static str, err: GatewayError) -> Self {
        match err {
            GatewayError::MissingCredential { variable } => AppError::ConfigurationMissing(variable),
            GatewayError::Timeout => AppError::UpstreamUnavailable {
                provider,
                reason: "timed out waiting for a completion".to_string(),
            },
            GatewayError::Http(e) => AppError::UpstreamUnavailable {
                provider,
                reason: e.to_string(),
            },
            GatewayError::Api { status, message } => AppError::UpstreamRejected {
                provider,
                status: Some(status),
                details: message,
            },
            GatewayError::Decode(message) => AppError::UpstreamRejected {
                provider,
                status: None,
                details: message,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::UpstreamUnavailable { provider, reason } => {
                tracing::error!("{provider} unavailable: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{provider} unavailable"),
                    None,
                )
            }
            AppError::UpstreamRejected {
                provider, details, ..
            } => {
                tracing::error!("{self}");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{provider} error"),
                    Some(details.clone()),
                )
            }
            AppError::ConfigurationMissing(variable) => {
                tracing::error!("Provider credential {variable} is not set");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: any handler panic becomes a 500 `{error}`
/// through `AppError::Internal`, with the panic payload kept for the log only.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
