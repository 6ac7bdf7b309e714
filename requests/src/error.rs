use fairplay_crypto::RandomnessError;
use fairplay_outcome::OutcomeError;
use fairplay_vrf::VrfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("randomness source unavailable: {0}")]
    Randomness(#[from] RandomnessError),

    #[error("outcome error: {0}")]
    Outcome(#[from] OutcomeError),

    #[error("VRF error: {0}")]
    Vrf(#[from] VrfError),
}
