use relay_service::config::RelayConfig;
use relay_service::services::metrics::init_metrics;
use relay_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "relay-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    init_metrics().map_err(|e| {
        tracing::error!("Failed to install metrics recorder: {}", e);
        anyhow::anyhow!("Metrics error: {}", e)
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
