//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, cache setup, AI backend wiring, worker
//! spawning and the Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::ai::{AiBackend, AnthropicBackend};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, StateParts};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link storage (PostgreSQL with migrations, or in-memory)
/// - Cache (Redis, in-memory, or disabled)
/// - AI backend when an API key is configured
/// - Background click worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;
    let ai_backend = build_ai_backend(&config)?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(StateParts {
        repository,
        cache,
        ai_backend,
        click_sender: click_tx,
        links: config.link_settings(),
        suggestions: config.suggestion_settings(),
        suggestion_cache_ttl: Duration::from_secs(config.suggestion_cache_ttl_seconds),
    });

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the configured link store.
///
/// # Errors
///
/// Returns an error if PostgreSQL is selected and the pool cannot connect
/// or migrations fail.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for PostgreSQL storage")?;

            let options = pg_connect_options(database_url, config.db_statement_timeout())?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
                .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
                .connect_with(options)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            Ok(Arc::new(InMemoryLinkRepository::new()))
        }
    }
}

/// Parses `database_url` and applies a server-side `statement_timeout` to
/// every pooled connection.
fn pg_connect_options(
    database_url: &str,
    statement_timeout: Duration,
) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(database_url).context("Invalid DATABASE_URL")?;

    Ok(options.options([(
        "statement_timeout",
        format!("{}ms", statement_timeout.as_millis()),
    )]))
}

/// Builds the cache backend. Never fails: an unreachable Redis degrades to
/// the in-memory cache or no cache at all.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_timeout()).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Falling back.", e);
            }
        }
    }

    if config.cache_in_memory {
        tracing::info!("Cache enabled (in-memory)");
        Arc::new(MemoryCache::new())
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

/// Builds the AI backend when an API key is configured.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn build_ai_backend(config: &Config) -> Result<Option<Arc<dyn AiBackend>>> {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        tracing::info!("AI suggestions disabled (no ANTHROPIC_API_KEY)");
        return Ok(None);
    };

    let backend = AnthropicBackend::new(
        api_key,
        config.ai_model.clone(),
        config.ai_base_url.clone(),
    )
    .context("Failed to create AI backend")?;
    tracing::info!(model = %config.ai_model, "AI suggestions enabled");

    Ok(Some(Arc::new(backend)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
