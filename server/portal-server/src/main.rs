use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal_server::{create_app, PortalServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; environment variables win.
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting ImagePortal HTTP server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    let bind_address = config.bind_address();
    let server = PortalServer::new(config);
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", bind_address))?;

    info!("ImagePortal server running on http://{}", bind_address);
    info!("Health check available at: http://{}/health", bind_address);
    info!("API v1 available at: http://{}/api/v1", bind_address);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portal_server=info,scheduling_service=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
