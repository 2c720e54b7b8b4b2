use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use lbe_core::error::{CoreError, FailureKind, RpcError};

use super::render;

// ==============================================================================
// Error Type
// ==============================================================================

/// Daemon error codes that mean "no such block/transaction" rather than a
/// broken daemon: -5 (invalid address or key) and -8 (invalid parameter).
const NOT_FOUND_CODES: [i64; 2] = [-5, -8];

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    /// The daemon could not be reached.
    Unavailable(String),
    /// The daemon answered with an error or unusable data.
    BadGateway(String),
    Internal(String),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }

    /// Render as an HTML error page instead of JSON.
    pub(super) fn into_page(self, coin: &str) -> PageError {
        PageError {
            coin: coin.to_owned(),
            error: self,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// An [`AppError`] rendered as a full HTML page.
pub(crate) struct PageError {
    coin: String,
    error: AppError,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.error.status_and_message();
        let body = render::error_page(&self.coin, status, &message);
        (status, Html(body)).into_response()
    }
}

pub(super) fn map_core_error(err: CoreError) -> AppError {
    match err {
        CoreError::Rpc(RpcError::ServerError { code, message })
            if NOT_FOUND_CODES.contains(&code) =>
        {
            AppError::NotFound(message)
        }
        CoreError::Rpc(rpc) => match rpc.kind() {
            FailureKind::Transport => {
                tracing::warn!(error = %rpc, "coin daemon unavailable");
                AppError::Unavailable(
                    "the coin daemon is not reachable right now, try again later".to_string(),
                )
            }
            FailureKind::Protocol => {
                tracing::warn!(error = %rpc, "coin daemon rejected request");
                AppError::BadGateway(rpc.to_string())
            }
        },
        CoreError::InvalidData(message) => {
            tracing::warn!(%message, "unexpected daemon data");
            AppError::BadGateway(format!("invalid daemon data: {message}"))
        }
        other => AppError::Internal(other.to_string()),
    }
}
