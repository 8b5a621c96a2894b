use anyhow::Context;
use dotenvy::dotenv;
use schoolyard::logging::{init_tracing, shutdown_tracer};
use schoolyard::metrics::{init_metrics, metrics_app};
use schoolyard::router::init_router;
use schoolyard::state::init_app_state;
use schoolyard_config::ServerConfig;
use schoolyard_db::run_migrations;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();

    if let Some(handle) = init_metrics()? {
        let listener = TcpListener::bind(&server_config.metrics_addr)
            .await
            .with_context(|| format!("Failed to bind {}", server_config.metrics_addr))?;
        info!(addr = %server_config.metrics_addr, "Metrics available at /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    run_migrations(&state.db).await?;
    let app = init_router(state);

    let listener = TcpListener::bind(&server_config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.addr))?;
    info!(addr = %server_config.addr, "🚀 Server running");
    info!("📚 Swagger UI at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
