//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener, shut down on signal
//! - Forward requests to the CDP target
//! - Hand upgrades to the WebSocket relay and `/json/version` to the interceptor

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::context::{ContextError, ProxyContext};
use crate::http::error::ProxyError;
use crate::http::{request, response, websocket};
use crate::net::connection::TunnelTracker;
use crate::rewrite::{host, policy, Interception};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ProxyContext>,
    pub client: Client<HttpConnector, Body>,
    pub tunnels: TunnelTracker,
}

/// HTTP server for the CDP proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    tunnels: TunnelTracker,
}

impl HttpServer {
    /// Create a new HTTP server from a validated configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ContextError> {
        let context = Arc::new(ProxyContext::from_config(&config)?);
        tracing::debug!(
            upstream = %context.upstream.authority(),
            spoof_host = context.spoof.host(),
            spoof_origin = context.spoof.origin(),
            "Proxy context built"
        );

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.upstream.connect_timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let tunnels = TunnelTracker::new();
        let state = AppState {
            context,
            client,
            tunnels: tunnels.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            tunnels,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.target,
            spoof_host = %self.config.spoof.host,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(open_tunnels = self.tunnels.active_count(), "HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Spoofs the request identity, forwards it, and relays or rewrites the response.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let is_upgrade = websocket::is_upgrade_request(&request);
    let decision = policy::decide(request.uri().path(), is_upgrade);

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        upgrade = is_upgrade,
        intercept = decision == Interception::Rewrite,
        "Proxying request"
    );

    if is_upgrade {
        return websocket::relay(&state, peer, request).await;
    }

    // Resolved before the spoofed Host overwrites what the client declared.
    let external_host = match decision {
        Interception::Rewrite => Some(host::resolve(
            request.headers(),
            request.uri(),
            &state.context.fallback_host,
        )),
        Interception::Passthrough => None,
    };

    let outbound = request::prepare(request, &state.context, peer, false)?;
    let upstream = state.client.request(outbound).await?;
    let (parts, body) = upstream.into_parts();
    let body = Body::new(body);

    Ok(match external_host {
        Some(external_host) => {
            response::intercept(
                parts,
                body,
                &external_host,
                &state.context.body_rewriter,
                state.context.max_body_bytes,
            )
            .await
        }
        None => response::passthrough(parts, body),
    })
}
