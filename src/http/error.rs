//! Errors surfaced to the client by the proxy core.
//!
//! Rewriting problems never show up here; they degrade to passthrough.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The CDP target could not be reached or dropped the connection.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The outbound request could not be assembled.
    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    /// The upstream URI could not be assembled.
    #[error("invalid upstream uri: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Build(_) | ProxyError::Uri(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ProxyError::Upstream(error) => {
                tracing::error!(%error, "Upstream unreachable");
                (status, "Upstream request failed").into_response()
            }
            other => {
                tracing::error!(error = %other, "Failed to forward request");
                (status, "Failed to forward request").into_response()
            }
        }
    }
}
