// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Serves `POST /api/contact` for a static site and forwards accepted
//! messages to a transactional mail provider.
//!
//! ## Configuration
//!
//! Configuration is loaded from a JSON file named by `CONFIG_FILE` and
//! environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Submissions per window per IP (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
//! - `MAIL_API_URL`: Provider send endpoint (unset: log only)
//! - `MAIL_API_TOKEN`, `MAIL_FROM`, `MAIL_TO`: Provider credentials and addresses
//! - `MAIL_HEALTH_URL`: Provider endpoint for health checks (unset: not probed)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use contact_relay::{
    config::{Config, MailConfig},
    gatekeeper::Gatekeeper,
    handlers::{router, AppState},
    mailer::{HttpApiMailer, LogMailer, MailRelay, Mailer},
    metrics::Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::load()?;
    let mailer = build_mailer(&config.mail)?;
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        transport = mailer.name(),
        "Starting contact relay"
    );

    let metrics = Arc::new(Metrics::new()?);
    let relay = MailRelay::new(mailer, config.mail.send_timeout());
    let gatekeeper = Gatekeeper::new(&config, relay, metrics.clone())?;

    let state = Arc::new(AppState {
        gatekeeper,
        metrics,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_interval = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            cleanup_state.gatekeeper.limiter().cleanup().await;
        }
    });

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Pick the mail transport from configuration.
fn build_mailer(config: &MailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    let Some(api_url) = &config.api_url else {
        warn!("MAIL_API_URL not set, messages will only be logged");
        return Ok(Arc::new(LogMailer));
    };

    let health_url = config.health_url.as_deref().map(Url::parse).transpose()?;
    let mailer = HttpApiMailer::new(
        Url::parse(api_url)?,
        health_url,
        config.api_token.clone(),
        config.send_timeout(),
    )?;
    Ok(Arc::new(mailer))
}
