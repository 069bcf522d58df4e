//! API request and response types.

use prize_draw::WeightPolicy;
use serde::{Deserialize, Serialize};

/// Registration form submission.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Registrant display name
    #[serde(default)]
    pub name: String,

    /// Phone number, used verbatim as the dedup key
    #[serde(default)]
    pub mobile: String,
}

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub session_id: String,
    pub name: String,
    pub message: String,
}

/// Result of the one spin a session gets.
#[derive(Debug, Serialize)]
pub struct SpinResponse {
    pub session_id: String,
    /// Index the renderer should land the wheel on
    pub index: usize,
    pub label: String,
    pub message: String,
}

/// Session status.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub name: String,
    pub created_at: String,
    pub drawn: bool,
    pub index: Option<usize>,
    pub label: Option<String>,
}

/// One wheel segment as exposed to the renderer.
#[derive(Debug, Serialize)]
pub struct PrizeInfo {
    pub index: usize,
    pub label: String,
    pub weight: f64,
}

/// The configured wheel.
#[derive(Debug, Serialize)]
pub struct PrizesResponse {
    pub policy: WeightPolicy,
    pub prizes: Vec<PrizeInfo>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub registrant_count: usize,
    pub active_sessions: usize,
}
