use thiserror::Error;

#[derive(Debug, Error)]
pub enum VrfError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid point encoding for {0}")]
    InvalidPoint(&'static str),

    #[error("response scalar is not canonical")]
    NonCanonicalScalar,

    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("hash to curve found no valid point after {0} attempts")]
    HashToCurve(u32),

    #[error("proof was created for a different alpha")]
    AlphaMismatch,

    #[error("verification failed")]
    VerificationFailed,

    #[error("randomness source failure: {0}")]
    Randomness(#[from] fairplay_crypto::RandomnessError),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("provider not available: {0}")]
    Unavailable(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
