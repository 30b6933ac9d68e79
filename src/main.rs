//! Sales leaderboard backend entrypoint wiring REST, WebSocket and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::sales_store::SalesStore;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    spawn_storage_supervisor(app_state.clone()).await;
    tokio::spawn(services::rollover_service::run(app_state.clone()));

    let app = build_router(app_state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(5002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start the storage supervision task: MongoDB when configured, the
/// in-memory store otherwise.
async fn spawn_storage_supervisor(state: SharedState) {
    #[cfg(feature = "mongo-store")]
    {
        use dao::sales_store::mongodb::{MongoSalesStore, config::MongoConfig};
        use dao::storage::StorageError;

        match MongoConfig::from_env().await {
            Ok(config) => {
                tokio::spawn(services::storage_supervisor::run(state, move || {
                    let config = config.clone();
                    async move {
                        let store = MongoSalesStore::connect(config)
                            .await
                            .map_err(StorageError::from)?;
                        Ok(Arc::new(store) as Arc<dyn SalesStore>)
                    }
                }));
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "MongoDB not configured; using the in-memory store");
            }
        }
    }

    use dao::sales_store::memory::MemorySalesStore;
    tokio::spawn(services::storage_supervisor::run(state, || async {
        Ok(Arc::new(MemorySalesStore::new()) as Arc<dyn SalesStore>)
    }));
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
