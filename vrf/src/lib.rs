//! Verifiable Random Function (VRF) for provably fair match randomness.
//!
//! - [`ecvrf`]: ECVRF-EDWARDS25519-SHA512-TAI proof generation and verification
//! - [`keys`]: VRF key generation and derivation
//! - [`selection`]: weighted, duplicate-free winner selection driven by VRF output
//! - [`provider`]: the [`VrfProvider`] seam the request service draws randomness from

pub mod ecvrf;
pub mod error;
pub mod keys;
pub mod proof;
pub mod provider;
pub mod selection;

pub use ecvrf::{proof_to_hash, prove, prove_with_budget, verify, DEFAULT_PROVE_BUDGET};
pub use error::VrfError;
pub use keys::{generate_keypair, keypair_from_secret, public_from_secret};
pub use proof::{VrfOutput, VrfProof, BETA_LEN, CHALLENGE_LEN, PROOF_LEN};
pub use provider::{LocalVrf, VrfProvider};
pub use selection::{select_winners, RandomStream, MAX_ATTEMPTS_PER_SLOT};
