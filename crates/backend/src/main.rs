pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use axum::http::{header, Method};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::shared::config::Config;

/// Маршруты API + статика фронтенда. Слои снаружи внутрь:
/// CORS, журнал запросов, режим обслуживания.
fn build_app(config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    routes::configure_routes()
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(middleware::from_fn(system::middleware::maintenance::maintenance_guard))
        .layer(middleware::from_fn(system::middleware::request_logger::request_logger))
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, finishing in-flight requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;
    tracing::info!("backend {} starting", env!("CARGO_PKG_VERSION"));

    let config = shared::config::init()?;

    let db_path = std::path::PathBuf::from(&config.database.path);
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    shared::data::migration_runner::run_migrations(&db_path).await?;

    system::maintenance::load(&config.maintenance).await?;
    system::initialization::ensure_admin_user_exists(&config.auth).await?;
    system::status::mark_started();
    system::housekeeping::spawn(&config.housekeeping.schedule)?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            tracing::error!("{} is already in use, is another backend running?", addr);
        } else {
            tracing::error!("Failed to bind to {}: {}", addr, e);
        }
        e
    })?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, build_app(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
