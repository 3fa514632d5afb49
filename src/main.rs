//! YaMDb - Application Entry Point

use std::net::SocketAddr;

use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yamdb::{
    config::CONFIG,
    db, handlers,
    services::{code_store, email_service, UserService},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting YaMDb server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize Redis connection
    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let codes = code_store::build(
        CONFIG.confirmation.backend,
        db_pool.clone(),
        redis_conn.clone(),
    );
    let mailer = email_service::build(&CONFIG.email)?;
    tracing::info!(
        code_backend = ?CONFIG.confirmation.backend,
        email_backend = ?CONFIG.email.backend,
        "Backends configured"
    );

    UserService::ensure_superuser(&db_pool, &CONFIG.bootstrap).await?;

    // Create application state
    let state = AppState::new(db_pool, redis_conn, mailer, codes, CONFIG.clone());

    // Build the router
    let app = handlers::app(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
