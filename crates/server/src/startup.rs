use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::auth::AuthConfig;
use service::media::LocalMediaStore;
use service::Services;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Wire the service layer onto PostgreSQL (migrated on startup) or, when
/// `database.in_memory` is set, onto the in-memory repositories.
pub async fn build_services(cfg: &AppConfig) -> Result<Services, StartupError> {
    let auth = AuthConfig::from(&cfg.auth);
    if cfg.database.in_memory {
        warn!("database.in_memory is set; data will not survive a restart");
        return Ok(Services::in_memory(auth));
    }
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    info!("migrations applied");
    Ok(Services::seaorm(db, auth))
}

pub fn build_app(services: Services, cfg: &AppConfig) -> Router {
    let state = ServerState {
        services,
        media: Arc::new(LocalMediaStore::new(&cfg.uploads.dir)),
        uploads: cfg.uploads.clone(),
    };
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::warn_missing_dotenv().await;
    common::env::ensure_upload_dirs(&cfg.uploads.dir).await?;

    let services = build_services(&cfg).await?;
    let app = build_app(services, &cfg);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "listing directory listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
