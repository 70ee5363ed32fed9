//! `/json/version` body rewriting.
//!
//! Chrome builds `webSocketDebuggerUrl` from the `Host` it was sent, which is
//! the spoofed one. The rewriter points that URL at the host the client used
//! instead. Only that field may change; anything unexpected degrades to
//! relaying the upstream bytes as received.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use crate::rewrite::host::ExternalHost;

/// The only field the rewriter touches.
pub const WEB_SOCKET_DEBUGGER_URL: &str = "webSocketDebuggerUrl";

/// Result of a rewrite attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteOutcome {
    /// Re-serialized body plus the headers that replace the upstream's.
    Rewritten { body: Bytes, headers: HeaderMap },
    /// The body was not JSON; relay the original bytes with the original
    /// status and headers.
    Passthrough(Bytes),
}

/// Substitutes the spoofed host in `webSocketDebuggerUrl`.
#[derive(Debug, Clone)]
pub struct BodyRewriter {
    spoof_host: String,
}

impl BodyRewriter {
    /// `spoof_host` is the same authority the request rewriter injects as `Host`.
    pub fn new(spoof_host: impl Into<String>) -> Self {
        Self {
            spoof_host: spoof_host.into(),
        }
    }

    pub fn rewrite(&self, raw: Bytes, external_host: &ExternalHost) -> RewriteOutcome {
        let document: Value = match serde_json::from_slice(&raw) {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(%error, "/json/version body is not JSON, passing through");
                return RewriteOutcome::Passthrough(raw);
            }
        };

        let rewritten = self.rewrite_document(document, external_host);

        match serde_json::to_vec(&rewritten) {
            Ok(body) => RewriteOutcome::Rewritten {
                body: Bytes::from(body),
                headers: rewritten_headers(),
            },
            Err(error) => {
                tracing::warn!(%error, "failed to serialize rewritten /json/version body");
                RewriteOutcome::Passthrough(raw)
            }
        }
    }

    /// Build a new document; only a string-valued field at the top level is rewritten.
    fn rewrite_document(&self, document: Value, external_host: &ExternalHost) -> Value {
        match document {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| match value {
                        Value::String(url) if key == WEB_SOCKET_DEBUGGER_URL => {
                            let url = self.substitute(url, external_host);
                            (key, Value::String(url))
                        }
                        other => (key, other),
                    })
                    .collect::<Map<String, Value>>(),
            ),
            other => other,
        }
    }

    fn substitute(&self, url: String, external_host: &ExternalHost) -> String {
        if self.spoof_host.is_empty() || !url.contains(&self.spoof_host) {
            return url;
        }
        url.replacen(&self.spoof_host, external_host.as_str(), 1)
    }
}

fn rewritten_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers
}
