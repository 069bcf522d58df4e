//! HTTP API for the spin wheel.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{
    rate_limit_middleware, RateLimitState, DEFAULT_GATE_PER_MINUTE, DEFAULT_PER_NUMBER_PER_HOUR,
};
pub use types::*;

use crate::session::SessionRegistry;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use prize_draw::{DrawObserver, OutcomeTable};
use registrant_store::DedupStore;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registrants that already passed the gate
    pub registrants: Arc<Mutex<DedupStore>>,
    /// Open wheel sessions
    pub sessions: Arc<RwLock<SessionRegistry>>,
    /// Configured wheel
    pub table: Arc<OutcomeTable>,
    /// Notified once per session, after its successful spin
    pub observer: Arc<dyn DrawObserver>,
    /// Gate and per-number limiters
    pub rate_limit: RateLimitState,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        registrants: DedupStore,
        table: OutcomeTable,
        observer: Arc<dyn DrawObserver>,
    ) -> Self {
        let table = Arc::new(table);
        Self {
            registrants: Arc::new(Mutex::new(registrants)),
            sessions: Arc::new(RwLock::new(SessionRegistry::new(table.clone()))),
            table,
            observer,
            rate_limit: RateLimitState::default(),
        }
    }
}

/// Create the API router with default rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::default())
}

/// Create the API router with custom rate limiting.
///
/// Only registration and spins spend the gate quota. Read-only routes are
/// never limited.
pub fn create_router_with_rate_limit(mut state: AppState, rate_limit: RateLimitState) -> Router {
    state.rate_limit = rate_limit.clone();

    let gated = Router::new()
        .route("/v1/register", post(handlers::register))
        .route("/v1/sessions/:id/spin", post(handlers::spin))
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/prizes", get(handlers::list_prizes))
        .route("/v1/sessions/:id", get(handlers::get_session))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
