//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the immutable proxy context from the validated configuration
//! - Bind the listener
//! - Install the signal watcher and serve until it fires
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, after the context is known to be valid

use crate::config::ProxyConfig;
use crate::http::context::ContextError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::listener::{self, ListenerError};

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the proxy and serve until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let server = HttpServer::new(config)?;
    let listener = listener::bind(&server.config().listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
