//! Backend entry-point: loads settings, runs migrations and serves the API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use coffee_chat::inbound::http::health::HealthState;
use coffee_chat::inbound::http::session_config::{BuildMode, session_settings_from_env};
use coffee_chat::outbound::auth::GoTrueAuthProvider;
use coffee_chat::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use coffee_chat::settings::AppSettings;

use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

async fn migrate(database_url: &str) -> io::Result<()> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| startup_error("migration task failed", err))?
        .map_err(|err| startup_error("failed to run migrations", err))?;
    info!(applied, "database schema up to date");
    Ok(())
}

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

    let settings =
        AppSettings::load().map_err(|err| startup_error("failed to load settings", err))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("invalid session configuration", err))?;

    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("invalid settings", err))?;
    migrate(database_url).await?;

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|err| startup_error("failed to build database pool", err))?;

    let auth_provider = GoTrueAuthProvider::new(
        settings
            .auth_url()
            .map_err(|err| startup_error("invalid settings", err))?,
        settings
            .auth_api_key()
            .map_err(|err| startup_error("invalid settings", err))?,
        settings
            .site_url()
            .map_err(|err| startup_error("invalid settings", err))?,
        settings.auth_timeout(),
    )
    .map_err(|err| startup_error("failed to build auth client", err))?;

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid settings", err))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind_addr, pool, auth_provider),
    )?;
    info!(%bind_addr, "listening");

    let handle = server.handle();
    let shutdown_health = health_state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received; draining");
            shutdown_health.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await
}
