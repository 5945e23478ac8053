mod assistant;
mod cache;
mod canned;
mod compose;
mod config;
mod error;
mod knowledge;
mod model;
mod rate_limit;
mod search;
mod server;
mod update;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::ReplyCache;
use config::Config;
use help_common::redis::RedisCache;
use rate_limit::RateLimiter;
use server::AppState;
use update::{DatasetSource, ReloadService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting help-center server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        listen_addr = %config.listen_addr,
        data_path = ?config.data_path,
        redis = config.redis_url.is_some(),
        cache_ttl_secs = config.cache_ttl_secs,
        rate_limit_rps = ?config.rate_limit_rps,
        "configuration loaded"
    );

    // 2. Connect to Redis (optional, degrades to uncached)
    let redis = RedisCache::new(config.redis_url.as_deref());
    match redis.ping().await {
        Ok(()) => info!("redis connected"),
        Err(e) if redis.is_configured() => {
            warn!(error = %e, "redis unreachable, running without cache")
        }
        Err(_) => info!("redis not configured, running without cache"),
    }
    let cache = Arc::new(ReplyCache::new(redis, config.cache_ttl_secs));

    // 3. Build the knowledge base
    let reload = ReloadService::new(
        DatasetSource::from_path(config.data_path.clone()),
        Arc::clone(&cache),
    );
    let knowledge = reload.load().await?;

    // 4. Serve
    let state = AppState::new(
        knowledge,
        cache,
        reload,
        RateLimiter::new(config.rate_limit_rps),
    );
    let app = server::router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %config.listen_addr, "help-center server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("help-center server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
