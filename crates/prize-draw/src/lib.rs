//! Weighted single-use prize draw.
//!
//! An [`OutcomeTable`] pairs each wheel label with its weight and result
//! message. A [`PrizeDraw`] selects one outcome by cumulative-weight
//! thresholds and then refuses every later draw, returning the locked index
//! instead. Rendering the spin is left to whoever consumes the index.

mod draw;
mod error;
mod observer;
mod outcome;

pub use draw::{select_index, DrawState, PrizeDraw};
pub use error::{DrawError, OutcomeTableError};
pub use observer::{DrawObserver, LogObserver, NoopObserver};
pub use outcome::{Outcome, OutcomeTable, WeightPolicy};
