//! Backend entry-point: loads settings, prepares the store and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use recipe_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use recipe_backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("invalid server settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, settings.bind_addr());
    if let Some(url) = settings.database_url() {
        if settings.run_migrations() {
            run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
