//! Probability-gated random events.

use serde::{Deserialize, Serialize};

use crate::OutcomeError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomEventResult {
    pub event_type: String,
    /// Trigger probability in percent, `0..=100`.
    pub probability: f64,
    /// The roll in `[0, 100)`.
    pub roll: f64,
    pub triggered: bool,
}

/// Check that `probability` is a percentage in `[0, 100]`.
pub fn validate_probability(probability: f64) -> Result<(), OutcomeError> {
    if probability.is_finite() && (0.0..=100.0).contains(&probability) {
        Ok(())
    } else {
        Err(OutcomeError::InvalidProbability(probability))
    }
}

/// Roll an event from a draw in `[0, 1)`. Triggered iff `roll < probability`,
/// so probability 0 never fires and probability 100 always does.
pub fn roll_random_event(
    event_type: &str,
    probability: f64,
    draw: f64,
) -> Result<RandomEventResult, OutcomeError> {
    validate_probability(probability)?;
    let roll = draw * 100.0;
    Ok(RandomEventResult {
        event_type: event_type.to_owned(),
        probability,
        roll,
        triggered: roll < probability,
    })
}
