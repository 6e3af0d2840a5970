use service_core::observability::init_tracing;
use upload_service::config::{UploadConfig, SERVICE_NAME};
use upload_service::services::init_metrics;
use upload_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Must be installed before any metric is recorded.
    init_metrics()?;

    let config = UploadConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::from(e)
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start {}: {}", SERVICE_NAME, e);
        std::io::Error::from(e)
    })?;

    app.run_until_stopped().await
}
