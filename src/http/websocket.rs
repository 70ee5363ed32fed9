//! WebSocket proxy handling.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade requests
//! - Forward the handshake upstream with the spoofed identity
//! - Relay the upstream's 101 to the client and join both upgraded streams
//! - Bidirectional byte copying until either side closes
//!
//! # Data Flow
//! ```text
//! Client ←──── raw bytes ────→ Proxy ←──── raw bytes ────→ CDP target
//! ```
//!
//! # Design Decisions
//! - Byte-level forwarding, no frame parsing and no buffering
//! - The response interception policy never applies to upgrades
//! - A non-101 upstream reply is relayed as an ordinary response

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use hyper_util::rt::TokioIo;
use tokio::io::copy_bidirectional;

use crate::http::error::ProxyError;
use crate::http::request;
use crate::http::server::AppState;

/// `Connection: upgrade` together with an `Upgrade` header.
pub fn is_upgrade_request<B>(req: &Request<B>) -> bool {
    let has_connection = req
        .headers()
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(',').any(|token| token.trim().eq_ignore_ascii_case("upgrade")));
    has_connection && req.headers().contains_key(header::UPGRADE)
}

/// Forward an upgrade handshake and, on success, tunnel both connections.
pub async fn relay(
    state: &AppState,
    peer: SocketAddr,
    mut request: Request<Body>,
) -> Result<Response, ProxyError> {
    let client_upgrade = hyper::upgrade::on(&mut request);
    let path = request.uri().path().to_string();

    let outbound = request::prepare(request, &state.context, peer, true)?;
    let mut upstream = state.client.request(outbound).await?;

    if upstream.status() != StatusCode::SWITCHING_PROTOCOLS {
        tracing::debug!(path = %path, status = %upstream.status(), "Upstream declined upgrade");
        let (parts, body) = upstream.into_parts();
        return Ok(Response::from_parts(parts, Body::new(body)));
    }

    let upstream_upgrade = hyper::upgrade::on(&mut upstream);
    let guard = state.tunnels.track();

    tokio::spawn(async move {
        let tunnel_id = guard.id();
        match tokio::try_join!(client_upgrade, upstream_upgrade) {
            Ok((client_io, upstream_io)) => {
                let mut client_io = TokioIo::new(client_io);
                let mut upstream_io = TokioIo::new(upstream_io);
                match copy_bidirectional(&mut client_io, &mut upstream_io).await {
                    Ok((to_upstream, to_client)) => tracing::debug!(
                        tunnel_id = %tunnel_id,
                        path = %path,
                        to_upstream,
                        to_client,
                        "Tunnel finished"
                    ),
                    Err(error) => tracing::warn!(tunnel_id = %tunnel_id, %error, "Tunnel error"),
                }
            }
            Err(error) => tracing::warn!(tunnel_id = %tunnel_id, %error, "Upgrade failed"),
        }
        drop(guard);
    });

    let (parts, _) = upstream.into_parts();
    Ok(Response::from_parts(parts, Body::empty()))
}
