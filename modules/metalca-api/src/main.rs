use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use metalca_api::{build_router, AppState};
use metalca_common::Config;
use openlca_client::OpenLcaClient;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("metalca=info".parse()?))
        .init();

    let config = Config::from_env()?;
    let engine = Arc::new(OpenLcaClient::new(&config.openlca_url));
    info!(openlca_url = %engine.base_url(), "Using OpenLCA IPC server");

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let state = Arc::new(AppState::new(config, engine).await?);
    let app = build_router(state);

    info!("MetaLCA dataset API starting on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
