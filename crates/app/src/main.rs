use std::sync::Arc;

use engine::DatabasePool;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "roster={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let pool = Arc::new(DatabasePool::new(settings.database.pool_options()?));
    if let Err(err) = pool.initialize().await {
        if !settings.database.wait_for_connection {
            tracing::error!("failed to start server: {err}");
            return Err(err.into());
        }
        tracing::info!("waiting for the database to become reachable...");
        pool.wait_ready().await;
    }

    let engine = engine::Engine::builder().pool(&pool).build().await?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}
