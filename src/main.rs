//! Vocab Cycle server entry point.
//!
//! Loads configuration, wires the storage adapters (PostgreSQL when a
//! `database` section is configured, in-memory otherwise), starts the audit
//! dispatcher and serves the HTTP API until SIGINT/SIGTERM.

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use http::{HeaderValue, Method};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use vocab_cycle::adapters::events::{
    AuditDispatcherConfig, ChannelEventPublisher, TracingAuditSink,
};
use vocab_cycle::adapters::http::{cycle_router, CycleAppState};
use vocab_cycle::adapters::memory::{InMemoryCycleStore, InMemoryVocabularyCatalog};
use vocab_cycle::adapters::postgres::{
    self, PostgresCycleStore, PostgresLearnedRecordStore, PostgresVocabularyCatalog,
};
use vocab_cycle::adapters::{OsRandomSource, SystemClock};
use vocab_cycle::application::UserLocks;
use vocab_cycle::config::{AppConfig, LogFormat, ServerConfig};
use vocab_cycle::ports::{CycleStore, EventHandler, LearnedRecordStore, VocabularyCatalog};

type BoxError = Box<dyn Error + Send + Sync>;

struct Stores {
    cycle_store: Arc<dyn CycleStore>,
    learned_store: Arc<dyn LearnedRecordStore>,
    catalog: Arc<dyn VocabularyCatalog>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let stores = build_stores(&config).await?;

    let sinks: Vec<Arc<dyn EventHandler>> = vec![Arc::new(TracingAuditSink)];
    let (publisher, dispatcher) =
        ChannelEventPublisher::channel(AuditDispatcherConfig::default(), sinks);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let audit_task = tokio::spawn(dispatcher.run(shutdown_rx));

    let state = CycleAppState {
        cycle_store: stores.cycle_store,
        learned_store: stores.learned_store,
        catalog: stores.catalog,
        event_publisher: Arc::new(publisher),
        clock: Arc::new(SystemClock),
        random: Arc::new(OsRandomSource),
        locks: Arc::new(UserLocks::new()),
        settings: config.engine_settings(),
    };

    let app = cycle_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    serve(app, &config.server).await?;

    tracing::info!("HTTP server stopped, draining audit queue");
    let _ = shutdown_tx.send(true);
    match audit_task.await {
        Ok(delivered) => tracing::info!(delivered, "Graceful shutdown complete"),
        Err(e) => tracing::error!(error = %e, "Audit dispatcher task failed"),
    }

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

async fn build_stores(config: &AppConfig) -> Result<Stores, BoxError> {
    let seed = match &config.catalog.seed_path {
        Some(path) => {
            let catalog = InMemoryVocabularyCatalog::from_json_file(path)?;
            tracing::info!(path = %path.display(), words = catalog.len(), "Catalog seed loaded");
            Some(catalog)
        }
        None => None,
    };

    match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            let catalog = PostgresVocabularyCatalog::new(pool.clone());
            if let Some(seed) = &seed {
                let imported = catalog.import(&seed.words()).await?;
                tracing::info!(imported, "Catalog seed imported into PostgreSQL");
            }
            tracing::info!("Using PostgreSQL storage");

            Ok(Stores {
                cycle_store: Arc::new(PostgresCycleStore::new(pool.clone())),
                learned_store: Arc::new(PostgresLearnedRecordStore::new(pool)),
                catalog: Arc::new(catalog),
            })
        }
        None => {
            if config.is_production() {
                tracing::warn!("No database configured; state will be lost on restart");
            }
            let catalog = seed.unwrap_or_default();
            if catalog.is_empty() {
                tracing::warn!("Vocabulary catalog is empty; words cannot be assigned");
            }
            tracing::info!("Using in-memory storage");

            let cycle_store = InMemoryCycleStore::new();
            let learned_store = cycle_store.learned_records();
            Ok(Stores {
                cycle_store: Arc::new(cycle_store),
                learned_store: Arc::new(learned_store),
                catalog: Arc::new(catalog),
            })
        }
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    } else if server.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}

async fn serve(app: Router, server: &ServerConfig) -> Result<(), BoxError> {
    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "vocab-cycle listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
