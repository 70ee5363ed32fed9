//! Response relaying and `/json/version` interception.
//!
//! # Responsibilities
//! - Stream ordinary responses to the client untouched
//! - Accumulate an intercepted body up to a fixed cap
//! - Run the body rewriter once on the complete body and emit the result
//!
//! # Design Decisions
//! - Two phases: bounded accumulation, then one synchronous transform
//! - Past the cap, the buffered prefix is replayed ahead of the rest of the
//!   stream; the client sees the upstream response as sent
//! - An upstream read error after buffering started is re-raised after the
//!   prefix, so the client connection is cut instead of silently truncated
//! - A dropped handler (client gone) drops the buffer and the upstream body

use axum::body::{Body, Bytes};
use axum::http::{header, response::Parts};
use axum::response::Response;
use futures_util::{stream, StreamExt};

use crate::rewrite::{BodyRewriter, ExternalHost, RewriteOutcome};

/// Outcome of the accumulation phase.
pub enum Accumulated {
    /// The whole body, within the cap.
    Complete(Bytes),
    /// Too large or failed mid-stream. Replays everything read so far,
    /// then continues with whatever the upstream still sends.
    Spilled(Body),
}

/// Read `body` until it ends or exceeds `limit` bytes.
pub async fn accumulate(body: Body, limit: usize) -> Accumulated {
    let mut upstream = body.into_data_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(frame) = upstream.next().await {
        match frame {
            Ok(chunk) => {
                buffer.extend_from_slice(&chunk);
                if buffer.len() > limit {
                    tracing::warn!(
                        limit,
                        buffered = buffer.len(),
                        "Intercepted body exceeds cap, passing through"
                    );
                    let prefix = stream::once(async move { Ok(Bytes::from(buffer)) });
                    return Accumulated::Spilled(Body::from_stream(prefix.chain(upstream)));
                }
            }
            Err(error) => {
                tracing::warn!(%error, buffered = buffer.len(), "Upstream body failed while buffering");
                let replay = stream::iter([Ok(Bytes::from(buffer)), Err(error)]);
                return Accumulated::Spilled(Body::from_stream(replay));
            }
        }
    }

    Accumulated::Complete(Bytes::from(buffer))
}

/// Relay an upstream response without looking at it.
pub fn passthrough(parts: Parts, body: Body) -> Response {
    Response::from_parts(parts, body)
}

/// Buffer, rewrite and emit an intercepted response.
pub async fn intercept(
    parts: Parts,
    body: Body,
    external_host: &ExternalHost,
    rewriter: &BodyRewriter,
    limit: usize,
) -> Response {
    if declared_length(&parts).is_some_and(|length| length > limit) {
        tracing::warn!(limit, "Declared Content-Length exceeds cap, passing through");
        return passthrough(parts, body);
    }

    let raw = match accumulate(body, limit).await {
        Accumulated::Complete(raw) => raw,
        Accumulated::Spilled(body) => return passthrough(parts, body),
    };

    match rewriter.rewrite(raw, external_host) {
        RewriteOutcome::Rewritten { body, headers } => {
            tracing::info!(external_host = %external_host, "Rewrote /json/version");
            let mut response = Response::new(Body::from(body));
            *response.status_mut() = parts.status;
            *response.headers_mut() = headers;
            response
        }
        RewriteOutcome::Passthrough(raw) => passthrough(parts, Body::from(raw)),
    }
}

fn declared_length(parts: &Parts) -> Option<usize> {
    parts
        .headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
