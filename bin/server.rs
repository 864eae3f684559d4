// Plant Toxins - Web Server

use anyhow::{Context, Result};
use plant_toxins::api::{router, AppState};
use plant_toxins::{open_database, setup_database, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    // Open database (schema setup is idempotent)
    let conn = open_database(&config.database_path)?;
    setup_database(&conn)?;
    info!("Database opened: {:?}", config.database_path);

    let app = router(AppState::new(conn));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("   API: http://{}/plants", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
