//! Draw completion notification.

use crate::outcome::Outcome;
use tracing::info;

/// Receives the locked outcome after a successful draw.
///
/// Callers invoke [`crate::PrizeDraw::notify`] explicitly once the draw
/// returns, so notification happens on the caller's own thread of control.
/// Each draw reports to its observers at most once.
pub trait DrawObserver: Send + Sync {
    fn on_drawn(&self, index: usize, outcome: &Outcome);
}

/// Logs every draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DrawObserver for LogObserver {
    fn on_drawn(&self, index: usize, outcome: &Outcome) {
        info!(index, label = %outcome.label, "Prize drawn");
    }
}

/// Ignores every draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DrawObserver for NoopObserver {
    fn on_drawn(&self, _index: usize, _outcome: &Outcome) {}
}
