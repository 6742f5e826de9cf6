//! Backend entry-point: loads settings, prepares persistence, and serves the
//! users API.

mod server;

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::outbound::security::JwtTokenService;
use backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;

    let secret = settings.jwt_secret().map_err(io::Error::other)?;
    let admin = settings.admin_account().map_err(io::Error::other)?;
    let tokens = JwtTokenService::new(&secret, settings.jwt_issuer(), settings.jwt_ttl_secs());

    let bind_addr = resolve_bind_addr(settings.host(), settings.port())?;
    let mut config = ServerConfig::new(bind_addr, Arc::new(tokens)).with_admin(admin);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, &settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "users API listening");
    server.await
}

fn resolve_bind_addr(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address for {host}:{port}"),
        )
    })
}

/// Apply pending migrations, then open the async connection pool.
async fn prepare_database(database_url: &str, settings: &ServerSettings) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
        .map_err(io::Error::other)?;
    info!(applied, "database migrations complete");

    let config = PoolConfig::new(database_url).with_max_size(settings.database_pool_size());
    DbPool::new(config).await.map_err(io::Error::other)
}
