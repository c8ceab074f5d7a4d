//! Backend entry-point: loads settings, prepares storage and serves the
//! users API with its OpenAPI docs.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use ortho_config::OrthoConfig;
use user_registry::ServerSettings;
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn init_tracing(plain: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if plain {
        builder.try_init()
    } else {
        builder.json().try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn build_config(settings: &ServerSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let config = ServerConfig::new(bind_addr);

    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; users are kept in memory");
        return Ok(config);
    };

    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
    )
    .await
    .map_err(std::io::Error::other)?;
    info!(max_size = settings.pool_max_size(), "database pool ready");
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    init_tracing(settings.log_plain);

    let config = build_config(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting user registry");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
