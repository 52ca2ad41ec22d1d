use std::net::SocketAddr;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use notifications::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!(
        path_prefix = %config.path_prefix,
        app_name = %config.app_name,
        catalog_admins = config.catalog_admins.len(),
        "Starting notifications backend"
    );
    if config.catalog_admins.is_empty() {
        tracing::warn!("NOTIFICATIONS_CATALOG_ADMINS is empty, apps, event types and levels are read-only");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(max_connections = config.db_max_connections, "Database ready");

    let addr = SocketAddr::new(config.host, config.port);
    let base_path = config.base_path();
    let app = notifications::build_app(pool, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}, resources under {base_path}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::warn!("Ctrl+C handler failed: {e}");
                "SIGINT (handler error)"
            }
        },
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal = received, "Shutting down, draining in-flight requests");
}
