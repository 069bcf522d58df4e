//! HTTP request handlers.

use super::types::{
    HealthResponse, PrizeInfo, PrizesResponse, RegisterRequest, RegisterResponse,
    SessionResponse, SpinResponse,
};
use super::AppState;
use crate::error::ServerError;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

/// Greeting shown once the registration gate opens.
pub const WELCOME_MESSAGE: &str = "Welcome to Techno Be With You!";

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registrant_count = state.registrants.lock().await.len();
    let active_sessions = state.sessions.read().await.count();

    Json(HealthResponse {
        status: "ok".to_string(),
        registrant_count,
        active_sessions,
    })
}

/// Describe the wheel for the renderer.
pub async fn list_prizes(State(state): State<AppState>) -> Json<PrizesResponse> {
    let prizes = state
        .table
        .outcomes()
        .iter()
        .enumerate()
        .map(|(index, o)| PrizeInfo {
            index,
            label: o.label.clone(),
            weight: o.weight,
        })
        .collect();

    Json(PrizesResponse {
        policy: state.table.policy(),
        prizes,
    })
}

/// Registration gate: validate, rate limit and dedup by phone number, open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ServerError> {
    let missing: Vec<&str> = [("name", &request.name), ("mobile", &request.mobile)]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
    if !missing.is_empty() {
        return Err(ServerError::Validation(missing.join(", ")));
    }

    state.rate_limit.check_registrant(&request.mobile)?;

    {
        let mut registrants = state.registrants.lock().await;
        if let Err(e) = registrants.register(&request.mobile).await {
            warn!(phone_number = %request.mobile, "Duplicate registration rejected");
            return Err(e.into());
        }
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.open(request.name, request.mobile);

    info!(phone_number = %session.mobile, session_id = %session.id, "Registrant admitted");

    Ok(Json(RegisterResponse {
        session_id: session.id.clone(),
        name: session.name.clone(),
        message: WELCOME_MESSAGE.to_string(),
    }))
}

/// Spend the session's single draw.
pub async fn spin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpinResponse>, ServerError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;

    let index = {
        let mut rng = rand::thread_rng();
        session.draw.draw(&mut rng)?
    };
    session.draw.notify(state.observer.as_ref());

    let outcome = session
        .draw
        .table()
        .get(index)
        .ok_or_else(|| ServerError::Internal(format!("Outcome {} missing from table", index)))?;

    info!(session_id = %id, index, label = %outcome.label, "Spin completed");

    Ok(Json(SpinResponse {
        session_id: id.clone(),
        index,
        label: outcome.label.clone(),
        message: outcome.message.clone(),
    }))
}

/// Get a session's status.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ServerError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;

    let drawn = session.draw.drawn();

    Ok(Json(SessionResponse {
        session_id: session.id.clone(),
        name: session.name.clone(),
        created_at: session.created_at.to_rfc3339(),
        drawn: drawn.is_some(),
        index: drawn.map(|(index, _)| index),
        label: drawn.map(|(_, outcome)| outcome.label.clone()),
    }))
}
