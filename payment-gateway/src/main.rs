use anyhow::Context;
use payment_gateway::{app, AppState, ServiceConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    let state = AppState::from_config(&config).context("failed to build gateway state")?;
    info!(
        gateways = ?state.registry.names().collect::<Vec<_>>(),
        accounts = ?config.virtual_accounts,
        gateway_path = %config.virtual_gateway.gateway_path,
        public_base_url = %config.public_base_url,
        "gateways registered"
    );

    let router = app(state);
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, "starting payment-gateway");
    axum::serve(listener, router).await?;
    Ok(())
}
