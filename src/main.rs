use std::{sync::Arc, time::Duration};

use quantix_mcp::{
    api_client::HttpApiClient,
    build_app,
    config::{Config, Environment},
    domain, logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let api = Arc::new(HttpApiClient::new(
        config.api_base_url.clone(),
        config.api_key.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?);
    let registry = domain::build_registry()?;
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.api_token.clone(), registry, api);
    let app = build_app(state);

    if config.environment == Environment::Test {
        info!("test environment, skipping listener startup");
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        api_base_url = %config.api_base_url,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
