//! Randomness-to-outcome mapping.
//!
//! Everything here is a pure function of verified VRF output plus the
//! request payload, except [`OutcomeResolver`], which also remembers which
//! matches already have an outcome so a match is never decided twice.

pub mod error;
pub mod random_event;
pub mod resolver;
pub mod shuffle;

pub use error::OutcomeError;
pub use random_event::{roll_random_event, validate_probability, RandomEventResult};
pub use resolver::{
    decide, decide_with_draw, outcome_confidence, strength, verification_hash, win_probability,
    MatchOutcome, OutcomeResolver, ResolutionMethod,
};
pub use shuffle::{shuffle, shuffle_indices};
