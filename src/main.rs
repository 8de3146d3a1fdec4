//! Tipping Back binary entrypoint wiring REST routes, storage and the reconciliation ticker.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tipping_back::{
    clock::SystemClock,
    config::AppConfig,
    dao::tipping_store::MemoryStore,
    routes,
    services::scheduler::ReconcileScheduler,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let reconcile_interval = config.reconcile_interval;
    let app_state = AppState::new(config, Arc::new(SystemClock));

    install_storage(&app_state).await?;

    let scheduler = ReconcileScheduler::new(app_state.clone(), reconcile_interval).spawn();
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    let served = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum");

    scheduler.shutdown().await;
    served
}

/// Select the storage backend from `STORAGE_BACKEND` and install or supervise it.
async fn install_storage(state: &SharedState) -> anyhow::Result<()> {
    let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| default_backend().into());

    match backend.as_str() {
        "memory" => {
            warn!("using in-memory storage; data is lost on restart");
            state.set_tipping_store(Arc::new(MemoryStore::new())).await;
            Ok(())
        }
        #[cfg(feature = "mongo-store")]
        "mongo" => {
            spawn_mongo_supervisor(state.clone());
            Ok(())
        }
        other => anyhow::bail!("unsupported STORAGE_BACKEND `{other}`"),
    }
}

fn default_backend() -> &'static str {
    if cfg!(feature = "mongo-store") {
        "mongo"
    } else {
        "memory"
    }
}

#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: SharedState) {
    use tipping_back::{
        dao::{
            storage::StorageError,
            tipping_store::{
                TippingStore,
                mongodb::{MongoConfig, MongoTippingStore},
            },
        },
        services::storage_supervisor,
    };

    let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let mongo_db = env::var("MONGO_DB").ok();

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = mongo_uri.clone();
        let db_name = mongo_db.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref())
                .await
                .map_err(StorageError::from)?;
            let store = MongoTippingStore::connect(config)
                .await
                .map_err(StorageError::from)?;
            Ok(Arc::new(store) as Arc<dyn TippingStore>)
        }
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

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
