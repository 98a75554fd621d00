// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use unshadow_metrics::application::metric_service::MetricService;
use unshadow_metrics::infrastructure::config::load_server_config;
use unshadow_metrics::infrastructure::sqlite_repository::SqliteRepository;
use unshadow_metrics::presentation::app_state::AppState;
use unshadow_metrics::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let server_config = load_server_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(SqliteRepository::connect(&server_config.database.url).await?);

    // Create services (application layer)
    let metric_service = MetricService::new(repository);

    // Create application state
    let state = Arc::new(AppState { metric_service });

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr = format!("{}:{}", server_config.http.host, server_config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Metric server running on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
