//! Scored match participants consumed by the outcome resolver.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// A participant with the scoring data the resolver weighs.
///
/// `score` is a non-negative performance score; `confidence` is a
/// percentage in `[0, 100]` that boosts the score's weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub score: f64,
    pub confidence: f64,
}

impl Participant {
    pub fn new(id: impl Into<PlayerId>, score: f64, confidence: f64) -> Self {
        Self {
            id: id.into(),
            score,
            confidence,
        }
    }

    /// Whether the scoring data is usable: finite, non-negative score and
    /// a confidence within `[0, 100]`.
    pub fn is_well_formed(&self) -> bool {
        self.score.is_finite()
            && self.score >= 0.0
            && self.confidence.is_finite()
            && (0.0..=100.0).contains(&self.confidence)
    }
}
