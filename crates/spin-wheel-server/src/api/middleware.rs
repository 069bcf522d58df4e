//! Rate limiting for the registration gate and the wheel.
//!
//! Two limits apply. The gate limit caps how fast the whole service admits
//! registrations and spins, and is layered only onto those routes so that
//! `/health` and `/v1/prizes` polling never spends it. The per-number limit
//! caps repeated registration attempts for one mobile number, whether they
//! succeed or bounce off the dedup store.

use crate::error::ServerError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultDirectRateLimiter, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};
use tracing::warn;

/// Gate quota used when the configured one is zero.
pub const DEFAULT_GATE_PER_MINUTE: u32 = 60;

/// Per-number quota used when the configured one is zero.
pub const DEFAULT_PER_NUMBER_PER_HOUR: u32 = 3;

/// Shared limiter state, cloned into the router and the app state.
#[derive(Clone)]
pub struct RateLimitState {
    gate: Arc<DefaultDirectRateLimiter>,
    per_number: Arc<DefaultKeyedRateLimiter<String>>,
}

impl RateLimitState {
    /// Build limiters from the configured quotas. Zero falls back to the default.
    pub fn new(gate_per_minute: u32, per_number_per_hour: u32) -> Self {
        let gate = Quota::per_minute(non_zero(gate_per_minute, DEFAULT_GATE_PER_MINUTE));
        let per_number = Quota::per_hour(non_zero(
            per_number_per_hour,
            DEFAULT_PER_NUMBER_PER_HOUR,
        ));

        Self {
            gate: Arc::new(RateLimiter::direct(gate)),
            per_number: Arc::new(RateLimiter::keyed(per_number)),
        }
    }

    /// Limits high enough that tests never hit them.
    pub fn permissive() -> Self {
        Self::new(1000, 1000)
    }

    /// Spend one unit of the gate quota.
    pub fn check_gate(&self) -> Result<(), ServerError> {
        self.gate.check().map_err(|_| {
            warn!("Gate rate limit exceeded");
            ServerError::RateLimitExceeded
        })
    }

    /// Spend one registration attempt for `mobile`.
    pub fn check_registrant(&self, mobile: &str) -> Result<(), ServerError> {
        let result = self.per_number.check_key(&mobile.to_string());
        // Drop keys whose quota has fully replenished
        self.per_number.retain_recent();
        result.map_err(|_| {
            warn!(phone_number = %mobile, "Per-number rate limit exceeded");
            ServerError::RateLimitExceeded
        })
    }
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_PER_MINUTE, DEFAULT_PER_NUMBER_PER_HOUR)
    }
}

fn non_zero(value: u32, fallback: u32) -> NonZeroU32 {
    NonZeroU32::new(value)
        .or_else(|| NonZeroU32::new(fallback))
        .unwrap_or(NonZeroU32::MIN)
}

/// Gate middleware for the registration and spin routes.
///
/// Returns 429 Too Many Requests once the gate quota is spent.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    rate_limit.check_gate()?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_exhaustion() {
        let state = RateLimitState::new(1, 10);

        assert!(state.check_gate().is_ok());
        assert!(matches!(
            state.check_gate(),
            Err(ServerError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_zero_quota_uses_default() {
        let state = RateLimitState::new(0, 0);
        for _ in 0..DEFAULT_GATE_PER_MINUTE {
            assert!(state.check_gate().is_ok());
        }
        assert!(state.check_gate().is_err());

        for _ in 0..DEFAULT_PER_NUMBER_PER_HOUR {
            assert!(state.check_registrant("9999999999").is_ok());
        }
        assert!(state.check_registrant("9999999999").is_err());
    }

    #[test]
    fn test_per_number_limit_is_keyed() {
        let state = RateLimitState::new(100, 2);

        assert!(state.check_registrant("9999999999").is_ok());
        assert!(state.check_registrant("9999999999").is_ok());
        assert!(state.check_registrant("9999999999").is_err());

        // Another number has its own budget
        assert!(state.check_registrant("8888888888").is_ok());
    }

    #[test]
    fn test_per_number_limit_leaves_gate_untouched() {
        let state = RateLimitState::new(1, 1);

        assert!(state.check_registrant("9999999999").is_ok());
        assert!(state.check_registrant("9999999999").is_err());
        assert!(state.check_gate().is_ok());
    }
}
