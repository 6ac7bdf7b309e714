use fairplay_types::MatchId;
use fairplay_vrf::VrfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutcomeError {
    #[error("match {0} already has an outcome")]
    AlreadyResolved(MatchId),

    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("probability {0} outside 0..=100")]
    InvalidProbability(f64),

    #[error("VRF error: {0}")]
    Vrf(#[from] VrfError),
}
