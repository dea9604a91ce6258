mod aggregate;
mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::Database;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Restaurant Ratings API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Database: {}", config.database.url);
    info!("   - API prefix: {}", config.server.api_prefix());
    info!("   - CORS origin: {}", config.server.cors_origin);

    // Initialize database
    info!("💾 Connecting to database...");
    let db = Database::connect(&config.database).await?;
    db.migrate().await?;
    info!(
        "✅ Database ready ({} restaurants, {} ratings)",
        db.count_restaurants().await?,
        db.count_ratings().await?
    );

    let state = AppState { db: db.clone() };
    let app = api::router(state, &config.server)?;

    // Start server
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let prefix = config.server.api_prefix();
    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /health                           - Health check");
    info!("   GET    {}/restaurants                    - List restaurants", prefix);
    info!("   GET    {}/restaurant/{{id}}               - Get restaurant", prefix);
    info!("   POST   {}/restaurant                     - Add restaurant", prefix);
    info!("   DELETE {}/restaurant_delete/{{id}}        - Delete restaurant", prefix);
    info!("   GET    {}/food_type/{{food_type}}         - Restaurants by food type", prefix);
    info!("   GET    {}/restaurants/averages           - Rating averages", prefix);
    info!("   GET    {}/ratings                        - List ratings", prefix);
    info!("   GET    {}/rating/{{id}}                   - Get rating", prefix);
    info!("   POST   {}/rating                         - Add rating", prefix);
    info!("   DELETE {}/rating_delete/{{id}}            - Delete rating", prefix);
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
