use appeal_letter_service::{ServiceConfig, create_app, telemetry::init_tracing};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env();
    init_tracing(config.log_format);

    let app = create_app(&config);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!(
        model = %config.model,
        variant = ?config.variant,
        "Medical Claim Appeal Generator starting on {}",
        addr
    );
    info!("Health check endpoint: http://{}/health", addr);
    info!("Generation endpoint: POST http://{}/appeal/generate", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
