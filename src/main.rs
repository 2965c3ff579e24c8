use std::sync::Arc;

use stream_panel::api;
use stream_panel::config::{Config, LogFormat};
use stream_panel::gateway::BackendClient;
use stream_panel::logging;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogFormat::Pretty);
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    logging::init(config.log_format);

    let backend = match BackendClient::new(&config.backend) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create backend client");
            std::process::exit(1);
        }
    };

    let routes = api::panel_routes(backend, &config.poll);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
    };

    match warp::serve(routes).try_bind_with_graceful_shutdown(config.bind_address(), shutdown) {
        Ok((addr, server)) => {
            tracing::info!(
                address = %addr,
                backend = %config.backend.url,
                "Control panel listening"
            );
            server.await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to bind control panel address");
            std::process::exit(1);
        }
    }
}
