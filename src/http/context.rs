//! Immutable per-process proxy context.
//!
//! Built once from a validated [`ProxyConfig`] and shared through `Arc` by
//! every handler. Nothing in it changes after startup.

use axum::http::uri::{Authority, InvalidUri, Parts, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::rewrite::headers::InvalidSpoofValue;
use crate::rewrite::{BodyRewriter, ExternalHost, SpoofIdentity};

/// Error turning configuration into a [`ProxyContext`].
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("upstream.target: {0}")]
    Target(#[from] url::ParseError),

    #[error("upstream.target has no host")]
    MissingHost,

    #[error("upstream.target authority: {0}")]
    Authority(#[from] InvalidUri),

    #[error(transparent)]
    Spoof(#[from] InvalidSpoofValue),
}

/// The single CDP endpoint requests are sent to.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    authority: Authority,
}

impl UpstreamTarget {
    pub fn parse(target: &str) -> Result<Self, ContextError> {
        let url = Url::parse(target)?;
        let host = url.host_str().ok_or(ContextError::MissingHost)?;
        let authority = match url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self {
            authority: authority.parse()?,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Point `original`'s path and query at the upstream.
    pub fn uri_for(&self, original: &Uri) -> Result<Uri, ProxyError> {
        let mut parts = Parts::default();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        parts.path_and_query = Some(
            original
                .path_and_query()
                .cloned()
                .unwrap_or_else(|| PathAndQuery::from_static("/")),
        );
        Ok(Uri::from_parts(parts)?)
    }
}

/// Everything the handlers read, fixed at startup.
#[derive(Debug, Clone)]
pub struct ProxyContext {
    pub upstream: UpstreamTarget,
    pub spoof: SpoofIdentity,
    pub body_rewriter: BodyRewriter,
    pub fallback_host: ExternalHost,
    pub max_body_bytes: usize,
    pub xfwd: bool,
}

impl ProxyContext {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ContextError> {
        Ok(Self {
            upstream: UpstreamTarget::parse(&config.upstream.target)?,
            spoof: SpoofIdentity::from_config(&config.spoof)?,
            body_rewriter: BodyRewriter::new(config.spoof.host.clone()),
            fallback_host: ExternalHost::new(config.rewrite.fallback_host.clone()),
            max_body_bytes: config.rewrite.max_body_bytes,
            xfwd: config.forwarding.xfwd,
        })
    }
}
