//! Spin Wheel Server - Entry point.

use prize_draw::LogObserver;
use registrant_store::{DedupStore, FileStore, KeyValueStore, MemoryStore};
use spin_wheel_server::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Spin Wheel Server");

    // Resolve the wheel before accepting traffic
    let table = match config.prizes.outcome_table() {
        Ok(t) => t,
        Err(e) => {
            error!("Invalid prize configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let total = table.total_weight();
    info!(
        "Prize table '{}' with {} outcomes (total weight {}, policy {:?})",
        config.prizes.table,
        table.len(),
        total,
        table.policy()
    );
    if (total - 1.0).abs() > 1e-9 {
        warn!("Prize weights sum to {}, not 1.0", total);
    }

    // Initialize storage
    let backend: Arc<dyn KeyValueStore> = if config.registry.persist {
        info!("Persisting registrants under {:?}", config.registry.path);
        Arc::new(FileStore::new(config.registry.path.clone()))
    } else {
        info!("Persistence disabled, using in-memory storage");
        Arc::new(MemoryStore::new())
    };

    let registrants = DedupStore::load(backend, config.registry.key.clone()).await;
    info!("Loaded {} registrants", registrants.len());

    // Create application state
    let state = AppState::new(registrants, table, Arc::new(LogObserver));

    // Create rate limiters from config
    let rate_limit = RateLimitState::new(
        config.rate_limit.global_per_minute,
        config.rate_limit.per_number_per_hour,
    );

    // Create router with rate limiting
    let app = create_router_with_rate_limit(state, rate_limit);

    // Bind to address
    let addr = match config.server.socket_addr() {
        Ok(a) => a,
        Err(e) => {
            error!("Invalid server configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
