//! Cricket scoreboard binary entrypoint wiring REST, WebSocket and storage layers.

use std::{env, net::SocketAddr, str::FromStr, sync::Arc};

use anyhow::{Context, anyhow};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "couch-store")]
use cricket_scoreboard_back::dao::match_store::couchdb::{CouchConfig, CouchMatchStore};
#[cfg(feature = "mongo-store")]
use cricket_scoreboard_back::dao::match_store::mongodb::{MongoConfig, MongoMatchStore};
#[cfg(any(feature = "mongo-store", feature = "couch-store"))]
use cricket_scoreboard_back::{
    dao::{match_store::MatchStore, storage::StorageError},
    services::storage_supervisor,
};
use cricket_scoreboard_back::{
    AppConfig,
    dao::match_store::memory::InMemoryStore,
    routes,
    services::auth::TokenKeys,
    state::{AppState, SharedState},
};

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let tokens = TokenKeys::from_env(config.token_ttl());
    let app_state = AppState::new(config, tokens);

    start_storage(app_state.clone()).await?;
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port()));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "scoreboard listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server stopped unexpectedly")
}

/// `PORT`, then `SERVER_PORT`, then [`DEFAULT_PORT`]. Unparsable values are skipped.
fn listen_port() -> u16 {
    ["PORT", "SERVER_PORT"]
        .into_iter()
        .find_map(|key| env::var(key).ok()?.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Storage selected through `STORE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreBackend {
    Memory,
    #[cfg(feature = "mongo-store")]
    Mongo,
    #[cfg(feature = "couch-store")]
    Couch,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            #[cfg(feature = "mongo-store")]
            "mongo" | "mongodb" => Ok(Self::Mongo),
            #[cfg(feature = "couch-store")]
            "couch" | "couchdb" => Ok(Self::Couch),
            other => Err(anyhow!("unsupported STORE_BACKEND `{other}`")),
        }
    }
}

/// Install the selected backend. Database backends connect in the background.
async fn start_storage(state: SharedState) -> anyhow::Result<()> {
    let backend: StoreBackend = env::var("STORE_BACKEND")
        .unwrap_or_else(|_| "mongo".into())
        .parse()?;
    info!(?backend, "storage backend selected");

    match backend {
        StoreBackend::Memory => {
            warn!("in-memory storage: matches and accounts are lost on restart");
            state.set_match_store(Arc::new(InMemoryStore::new())).await;
        }
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            tokio::spawn(storage_supervisor::run(state, connect_mongo));
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            tokio::spawn(storage_supervisor::run(state, connect_couch));
        }
    }

    Ok(())
}

#[cfg(feature = "mongo-store")]
async fn connect_mongo() -> Result<Arc<dyn MatchStore>, StorageError> {
    let config = MongoConfig::from_env().await?;
    let store = MongoMatchStore::connect(config).await?;
    Ok(Arc::new(store))
}

#[cfg(feature = "couch-store")]
async fn connect_couch() -> Result<Arc<dyn MatchStore>, StorageError> {
    let config = CouchConfig::from_env()?;
    let store = CouchMatchStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// API routes wrapped in permissive CORS and request tracing.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// `RUST_LOG` wins over the built-in filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
