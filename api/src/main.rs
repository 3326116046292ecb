use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;

use sv_api::{create_app, telemetry, AppState};
use sv_infra::{DatabasePool, PgStore};
use sv_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guards = telemetry::init(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        "Starting {} v{}",
        config.app.name,
        config.app.version
    );

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to create database pool")?;
    if !pool
        .health_check()
        .await
        .context("database health check failed")?
    {
        anyhow::bail!("database health check returned an unexpected result");
    }
    if config.database.run_migrations {
        pool.run_migrations()
            .await
            .context("failed to run database migrations")?;
    }
    tracing::info!("{}", pool.get_statistics());

    let bind_address = config.server.bind_address();
    let keep_alive = Duration::from_secs(config.server.keep_alive);
    let workers = config.server.workers;
    let state = web::Data::new(AppState::new(PgStore::from_pool(&pool), config));

    let mut server = HttpServer::new(move || create_app(state.clone())).keep_alive(keep_alive);
    if workers > 0 {
        server = server.workers(workers);
    }

    tracing::info!(address = %bind_address, "Server listening");
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}
