//! Outcome tables.

use crate::draw::find_index;
use crate::error::OutcomeTableError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One labeled slice of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Text shown on the wheel segment
    pub label: String,

    /// Probability mass, relative or absolute depending on [`WeightPolicy`]
    pub weight: f64,

    /// Result message shown once the wheel stops
    pub message: String,
}

impl Outcome {
    pub fn new(label: impl Into<String>, weight: f64, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            weight,
            message: message.into(),
        }
    }
}

/// How weights map onto the uniform draw `r` in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Cumulative weights are compared against `r` as-is. If `r` lands past
    /// the final cumulative sum the draw falls back to the first outcome.
    #[default]
    Absolute,
    /// Cumulative weights are scaled by their total, so any non-zero table
    /// covers the whole `[0, 1)` range.
    Normalized,
}

impl FromStr for WeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(WeightPolicy::Absolute),
            "normalized" | "normalised" => Ok(WeightPolicy::Normalized),
            other => Err(format!("Unknown weight policy: {}", other)),
        }
    }
}

/// Immutable, non-empty ordered list of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeTable {
    outcomes: Vec<Outcome>,
    policy: WeightPolicy,
}

impl OutcomeTable {
    /// Build a table, rejecting empty lists and negative or non-finite weights.
    pub fn new(outcomes: Vec<Outcome>, policy: WeightPolicy) -> Result<Self, OutcomeTableError> {
        if outcomes.is_empty() {
            return Err(OutcomeTableError::Empty);
        }

        if let Some(bad) = outcomes
            .iter()
            .find(|o| !o.weight.is_finite() || o.weight < 0.0)
        {
            return Err(OutcomeTableError::InvalidWeight {
                label: bad.label.clone(),
                weight: bad.weight,
            });
        }

        Ok(Self { outcomes, policy })
    }

    /// The event wheel: three prizes at 0.1 each and a consolation slice at 0.9.
    pub fn promotional() -> Self {
        Self {
            outcomes: vec![
                Outcome::new(
                    "Free Hoodie",
                    0.1,
                    "Congratulations! You won a Free Hoodie! 🎉",
                ),
                Outcome::new("Free T-shirt", 0.1, "Awesome! You won a Free T-shirt! 👕"),
                Outcome::new(
                    "20% Off at Stall",
                    0.1,
                    "Great! You got 20% Off at our stall! 🎫",
                ),
                Outcome::new("Better Luck Next Time", 0.9, "You were this 🤌 close to win!"),
            ],
            policy: WeightPolicy::Absolute,
        }
    }

    /// Four-way 0.3/0.3/0.2/0.2 split.
    pub fn even_split() -> Self {
        let outcome = |label: &str, weight| {
            Outcome::new(label, weight, format!("You landed on {}!", label))
        };
        Self {
            outcomes: vec![
                outcome("A", 0.3),
                outcome("B", 0.3),
                outcome("C", 0.2),
                outcome("D", 0.2),
            ],
            policy: WeightPolicy::Absolute,
        }
    }

    /// Look up a built-in table by name.
    pub fn preset(name: &str) -> Result<Self, OutcomeTableError> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "promotional" => Ok(Self::promotional()),
            "even_split" | "even" => Ok(Self::even_split()),
            _ => Err(OutcomeTableError::UnknownPreset(name.to_string())),
        }
    }

    /// Same outcomes under a different weight policy.
    pub fn with_policy(mut self, policy: WeightPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn get(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn policy(&self) -> WeightPolicy {
        self.policy
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.outcomes.iter().map(|o| o.weight).sum()
    }

    /// Map a uniform value `r` in `[0, 1)` to an outcome index.
    ///
    /// The result is always a valid index.
    pub fn select(&self, r: f64) -> usize {
        let weights = self.outcomes.iter().map(|o| o.weight);

        match self.policy {
            WeightPolicy::Absolute => find_index(weights, r).unwrap_or(0),
            WeightPolicy::Normalized => {
                let total = self.total_weight();
                if total <= 0.0 {
                    return 0;
                }
                // Rounding can push r * total a hair past the last sum.
                find_index(weights, r * total).unwrap_or_else(|| {
                    self.outcomes
                        .iter()
                        .rposition(|o| o.weight > 0.0)
                        .unwrap_or(0)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(
            OutcomeTable::new(vec![], WeightPolicy::Absolute),
            Err(OutcomeTableError::Empty)
        );
    }

    #[test]
    fn test_rejects_bad_weights() {
        let negative = OutcomeTable::new(
            vec![Outcome::new("A", 0.5, ""), Outcome::new("B", -0.1, "")],
            WeightPolicy::Absolute,
        );
        assert!(matches!(
            negative,
            Err(OutcomeTableError::InvalidWeight { ref label, .. }) if label == "B"
        ));

        let nan = OutcomeTable::new(vec![Outcome::new("A", f64::NAN, "")], WeightPolicy::Absolute);
        assert!(nan.is_err());

        let inf = OutcomeTable::new(
            vec![Outcome::new("A", f64::INFINITY, "")],
            WeightPolicy::Absolute,
        );
        assert!(inf.is_err());
    }

    #[test]
    fn test_zero_weights_allowed() {
        let table = OutcomeTable::new(
            vec![Outcome::new("A", 0.0, ""), Outcome::new("B", 0.0, "")],
            WeightPolicy::Absolute,
        )
        .unwrap();
        assert_eq!(table.select(0.0), 0);
        assert_eq!(table.select(0.5), 0);
    }

    #[test]
    fn test_promotional_scenario() {
        let table = OutcomeTable::promotional();

        assert_eq!(table.select(0.05), 0);
        assert_eq!(table.select(0.15), 1);
        assert_eq!(table.select(0.25), 2);
        assert_eq!(table.select(0.95), 3);
    }

    #[test]
    fn test_promotional_boundaries() {
        let table = OutcomeTable::promotional();

        // Exact cumulative sums select the lower index
        assert_eq!(table.select(0.1), 0);
        assert_eq!(table.select(0.2), 1);
        // Cumulative sums run 0.1, 0.2, 0.3, 1.2, so r = 1.0 is still inside the last slice
        assert_eq!(table.select(1.0), 3);
        // Past the final sum falls back to the first outcome
        assert_eq!(table.select(1.25), 0);
    }

    #[test]
    fn test_select_agrees_with_select_index() {
        let table = OutcomeTable::promotional();
        let weights: Vec<f64> = table.outcomes().iter().map(|o| o.weight).collect();

        for step in 0..=130 {
            let r = step as f64 / 100.0;
            assert_eq!(table.select(r), crate::select_index(&weights, r), "r = {}", r);
        }
    }

    #[test]
    fn test_underflow_fallback() {
        // Sums to 0.9
        let table = OutcomeTable::new(
            vec![
                Outcome::new("A", 0.3, ""),
                Outcome::new("B", 0.3, ""),
                Outcome::new("C", 0.3, ""),
            ],
            WeightPolicy::Absolute,
        )
        .unwrap();

        assert_eq!(table.select(0.85), 2);
        assert_eq!(table.select(0.91), 0);
        assert_eq!(table.select(0.999), 0);
    }

    #[test]
    fn test_normalized_covers_full_range() {
        let table = OutcomeTable::new(
            vec![
                Outcome::new("A", 0.3, ""),
                Outcome::new("B", 0.3, ""),
                Outcome::new("C", 0.3, ""),
            ],
            WeightPolicy::Normalized,
        )
        .unwrap();

        assert_eq!(table.select(0.2), 0);
        assert_eq!(table.select(0.5), 1);
        assert_eq!(table.select(0.91), 2);
        assert_eq!(table.select(0.999_999), 2);
    }

    #[test]
    fn test_normalized_skips_trailing_zero_weight() {
        let table = OutcomeTable::new(
            vec![Outcome::new("A", 1.0, ""), Outcome::new("B", 0.0, "")],
            WeightPolicy::Normalized,
        )
        .unwrap();

        assert_eq!(table.select(0.999_999), 0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(OutcomeTable::preset("promotional").unwrap().len(), 4);
        assert_eq!(
            OutcomeTable::preset("even-split").unwrap(),
            OutcomeTable::even_split()
        );
        assert!(matches!(
            OutcomeTable::preset("jackpot"),
            Err(OutcomeTableError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_even_split_weights() {
        let table = OutcomeTable::even_split();
        let labels: Vec<&str> = table.outcomes().iter().map(|o| o.label.as_str()).collect();

        assert_eq!(labels, ["A", "B", "C", "D"]);
        assert!((table.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_policy_parsing() {
        assert_eq!("absolute".parse::<WeightPolicy>(), Ok(WeightPolicy::Absolute));
        assert_eq!("Normalized".parse::<WeightPolicy>(), Ok(WeightPolicy::Normalized));
        assert!("other".parse::<WeightPolicy>().is_err());

        let json = serde_json::to_string(&WeightPolicy::Normalized).unwrap();
        assert_eq!(json, "\"normalized\"");
    }
}
