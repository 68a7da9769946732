//! aurora-pulse server entry point.
//!
//! Builds the AWS clients once, wires the probe pipeline, and starts
//! the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use aurora_pulse::api;
use aurora_pulse::app_state::AppState;
use aurora_pulse::config::ProbeConfig;
use aurora_pulse::logstream::{CloudWatchSink, LogStreamManager};
use aurora_pulse::probe::{ConnectivityProbe, PgDriver};
use aurora_pulse::secret::{SecretResolver, SecretsManagerStore};
use aurora_pulse::service::ProbeOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ProbeConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting aurora-pulse");

    // Build AWS clients once; they are stateless handles shared by
    // all concurrent invocations.
    let aws_config = aws_config::load_from_env().await;
    let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);
    let logs_client = aws_sdk_cloudwatchlogs::Client::new(&aws_config);

    // Wire the probe pipeline
    let resolver = SecretResolver::new(Arc::new(SecretsManagerStore::new(secrets_client)));
    let logs = LogStreamManager::new(
        Arc::new(CloudWatchSink::new(logs_client)),
        config.log_group.clone(),
        config.log_stream_prefix.clone(),
        config.log_retention_days,
    );
    let probe = ConnectivityProbe::new(Arc::new(PgDriver::new()), config.connect_timeout);
    let orchestrator = Arc::new(ProbeOrchestrator::new(
        config.secret_id.clone(),
        resolver,
        logs,
        probe,
    ));

    // Build application state
    let app_state = AppState { orchestrator };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
