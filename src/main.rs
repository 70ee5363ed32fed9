//! CDP reverse proxy.
//!
//! Makes a Chrome DevTools Protocol endpoint that only accepts `localhost`
//! reachable from any host.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  CDP PROXY                   │
//!                        │                                              │
//!     Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ───────────────────┼─▶│   net   │───▶│  http   │───▶│ rewrite  │──┼──▶ CDP target
//!                        │  │listener │    │ server  │    │ headers  │  │    (Origin/Host
//!                        │  └─────────┘    └────┬────┘    └──────────┘  │     spoofed)
//!                        │                      │ upgrade               │
//!                        │                      ▼                       │
//!                        │                ┌───────────┐                 │
//!     WebSocket tunnel   │                │ websocket │◀────────────────┼──▶ debugger
//!     ◀──────────────────┼────────────────│  relay    │                 │    socket
//!                        │                └───────────┘                 │
//!                        │                                              │
//!     Client Response    │  ┌──────────┐  ┌──────────┐   ┌──────────┐   │
//!     ◀──────────────────┼──│ response │◀─│  policy  │◀──│ upstream │◀──┼─── CDP target
//!                        │  │ (buffer, │  │/json/ver?│   │ response │   │
//!                        │  │ rewrite) │  └──────────┘   └──────────┘   │
//!                        │  └──────────┘                                │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use cdp_proxy::config::{self, Overrides};
use cdp_proxy::lifecycle::startup;
use cdp_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "cdp-proxy")]
#[command(about = "Expose a local Chrome DevTools Protocol endpoint on an external host", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "CDP_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:30001.
    #[arg(short, long, env = "CDP_PROXY_LISTEN")]
    listen: Option<String>,

    /// CDP endpoint, e.g. http://localhost:9222.
    #[arg(short, long, env = "CDP_PROXY_TARGET")]
    target: Option<String>,

    /// Authority presented to the CDP endpoint as Host.
    #[arg(long, env = "CDP_PROXY_SPOOF_HOST")]
    spoof_host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "CDP_PROXY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind_address: self.listen.clone(),
            target: self.target.clone(),
            spoof_host: self.spoof_host.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref(), &cli.overrides())?;

    logging::init(&config.observability);

    tracing::info!("cdp-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.target,
        spoof_host = %config.spoof.host,
        spoof_origin = %config.spoof.effective_origin(),
        max_body_bytes = config.rewrite.max_body_bytes,
        xfwd = config.forwarding.xfwd,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
