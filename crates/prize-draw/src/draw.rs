//! Weighted selection and the single-use draw state machine.

use crate::error::DrawError;
use crate::observer::DrawObserver;
use crate::outcome::{Outcome, OutcomeTable};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Smallest `i` with `r <= w[0] + ... + w[i]`, if any.
pub(crate) fn find_index(weights: impl IntoIterator<Item = f64>, r: f64) -> Option<usize> {
    let mut sum = 0.0;
    for (i, w) in weights.into_iter().enumerate() {
        sum += w;
        if r <= sum {
            return Some(i);
        }
    }
    None
}

/// Pick an index by cumulative thresholds.
///
/// Returns the smallest `i` such that `r <= w[0] + ... + w[i]`. A value equal
/// to a cumulative sum selects the lower index. If `r` lies past the final
/// sum (weights adding up to less than `r`) the first index is returned.
pub fn select_index(weights: &[f64], r: f64) -> usize {
    find_index(weights.iter().copied(), r).unwrap_or(0)
}

/// Where a session's draw stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum DrawState {
    NotDrawn,
    Drawn(usize),
}

/// One session's draw: usable exactly once.
#[derive(Debug, Clone)]
pub struct PrizeDraw {
    table: Arc<OutcomeTable>,
    state: DrawState,
    notified: bool,
}

impl PrizeDraw {
    pub fn new(table: Arc<OutcomeTable>) -> Self {
        Self {
            table,
            state: DrawState::NotDrawn,
            notified: false,
        }
    }

    /// Draw with a uniform `r` in `[0, 1)` taken from `rng`.
    ///
    /// Once drawn, later calls leave the state alone and return
    /// [`DrawError::AlreadyUsed`] with the locked index. No randomness is
    /// consumed on a rejected call.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, DrawError> {
        self.ensure_unused()?;
        let r: f64 = rng.gen();
        self.draw_at(r)
    }

    /// Draw with a caller-supplied `r`.
    pub fn draw_at(&mut self, r: f64) -> Result<usize, DrawError> {
        self.ensure_unused()?;

        let index = self.table.select(r);
        self.state = DrawState::Drawn(index);
        debug!(r, index, "Draw locked");
        Ok(index)
    }

    /// Tell `observer` about the locked outcome.
    ///
    /// Delivered at most once per draw, after the successful first draw.
    /// Returns whether the observer was called.
    pub fn notify(&mut self, observer: &dyn DrawObserver) -> bool {
        if self.notified {
            return false;
        }
        let Some((index, outcome)) = self.drawn() else {
            return false;
        };
        observer.on_drawn(index, outcome);
        self.notified = true;
        true
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self.state, DrawState::Drawn(_))
    }

    /// The locked index and outcome, once drawn.
    pub fn drawn(&self) -> Option<(usize, &Outcome)> {
        match self.state {
            DrawState::NotDrawn => None,
            DrawState::Drawn(index) => self.table.get(index).map(|o| (index, o)),
        }
    }

    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }

    fn ensure_unused(&self) -> Result<(), DrawError> {
        match self.state {
            DrawState::NotDrawn => Ok(()),
            DrawState::Drawn(index) => {
                warn!(index, "Draw already used");
                Err(DrawError::AlreadyUsed { index })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::WeightPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn promotional() -> PrizeDraw {
        PrizeDraw::new(Arc::new(OutcomeTable::promotional()))
    }

    #[test]
    fn test_select_index_lower_on_tie() {
        let weights = [0.25, 0.25, 0.5];
        assert_eq!(select_index(&weights, 0.0), 0);
        assert_eq!(select_index(&weights, 0.25), 0);
        assert_eq!(select_index(&weights, 0.2500001), 1);
        assert_eq!(select_index(&weights, 0.5), 1);
        assert_eq!(select_index(&weights, 0.75), 2);
    }

    #[test]
    fn test_select_index_underflow_falls_back_to_first() {
        let weights = [0.1, 0.1, 0.1, 0.6];
        for r in [0.91, 0.95, 0.999_999] {
            assert_eq!(select_index(&weights, r), 0, "r = {}", r);
        }
    }

    #[test]
    fn test_select_index_skips_zero_weight_prefix() {
        let weights = [0.0, 0.0, 1.0];
        assert_eq!(select_index(&weights, 0.0), 0);
        assert_eq!(select_index(&weights, 0.01), 2);
    }

    #[test]
    fn test_find_index_over_iterator() {
        let outcomes = [("a", 0.5), ("b", 0.5)];
        let weights = outcomes.iter().map(|(_, w)| *w);

        assert_eq!(find_index(weights.clone(), 0.75), Some(1));
        assert_eq!(find_index(weights, 1.5), None);
        assert_eq!(find_index(std::iter::empty::<f64>(), 0.0), None);
    }

    #[test]
    fn test_initial_state() {
        let draw = promotional();
        assert_eq!(draw.state(), DrawState::NotDrawn);
        assert!(!draw.is_drawn());
        assert!(draw.drawn().is_none());
    }

    #[test]
    fn test_draw_at_locks_outcome() {
        let mut draw = promotional();

        assert_eq!(draw.draw_at(0.15), Ok(1));
        assert_eq!(draw.state(), DrawState::Drawn(1));

        let (index, outcome) = draw.drawn().unwrap();
        assert_eq!(index, 1);
        assert_eq!(outcome.label, "Free T-shirt");
    }

    #[test]
    fn test_second_draw_rejected_with_same_index() {
        let mut draw = promotional();

        let first = draw.draw_at(0.95).unwrap();
        let second = draw.draw_at(0.05);

        assert_eq!(first, 3);
        assert_eq!(second, Err(DrawError::AlreadyUsed { index: 3 }));
        assert_eq!(draw.state(), DrawState::Drawn(3));
    }

    #[test]
    fn test_rng_draw_rejected_after_use() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut draw = promotional();

        let index = draw.draw(&mut rng).unwrap();
        for _ in 0..10 {
            assert_eq!(draw.draw(&mut rng), Err(DrawError::AlreadyUsed { index }));
        }
        assert_eq!(draw.state(), DrawState::Drawn(index));
    }

    #[test]
    fn test_index_always_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = Arc::new(OutcomeTable::promotional());

        for _ in 0..1_000 {
            let mut draw = PrizeDraw::new(table.clone());
            let index = draw.draw(&mut rng).unwrap();
            assert!(index < table.len());
        }
    }

    #[test]
    fn test_frequencies_converge() {
        let table = Arc::new(OutcomeTable::even_split());
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 100_000;
        let mut counts = [0usize; 4];

        for _ in 0..trials {
            let mut draw = PrizeDraw::new(table.clone());
            counts[draw.draw(&mut rng).unwrap()] += 1;
        }

        for (count, outcome) in counts.iter().zip(table.outcomes()) {
            let freq = *count as f64 / trials as f64;
            assert!(
                (freq - outcome.weight).abs() < 0.01,
                "{}: expected {}, got {}",
                outcome.label,
                outcome.weight,
                freq
            );
        }
    }

    #[test]
    fn test_normalized_frequencies_converge() {
        let table = OutcomeTable::new(
            vec![
                Outcome::new("A", 1.0, ""),
                Outcome::new("B", 3.0, ""),
            ],
            WeightPolicy::Normalized,
        )
        .unwrap();
        let table = Arc::new(table);
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 50_000;
        let mut hits_b = 0usize;

        for _ in 0..trials {
            if PrizeDraw::new(table.clone()).draw(&mut rng).unwrap() == 1 {
                hits_b += 1;
            }
        }

        let freq = hits_b as f64 / trials as f64;
        assert!((freq - 0.75).abs() < 0.01, "got {}", freq);
    }

    #[test]
    fn test_draw_state_serialization() {
        let json = serde_json::to_string(&DrawState::NotDrawn).unwrap();
        assert_eq!(json, r#"{"state":"not_drawn"}"#);

        let json = serde_json::to_string(&DrawState::Drawn(2)).unwrap();
        assert_eq!(json, r#"{"state":"drawn","index":2}"#);
    }
}
