//! VRF proof and output containers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::VrfError;

/// Length of the truncated challenge `c`.
pub const CHALLENGE_LEN: usize = 16;
/// Length of the encoded proof string `gamma || c || s`.
pub const PROOF_LEN: usize = 32 + CHALLENGE_LEN + 32;
/// Length of the VRF output `beta`.
pub const BETA_LEN: usize = 32;

/// An ECVRF proof together with the input it was produced for.
///
/// A proof is only meaningful paired with the `alpha` and public key that
/// created it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfProof {
    /// `x * H`, the secret-scaled hash-to-curve point (compressed).
    pub gamma: [u8; 32],
    /// Truncated Fiat-Shamir challenge.
    pub c: [u8; CHALLENGE_LEN],
    /// Response scalar `k + c * x mod L`.
    pub s: [u8; 32],
    /// The input message.
    pub alpha: Vec<u8>,
}

impl VrfProof {
    /// Encode as the 80-byte `gamma || c || s` proof string.
    pub fn to_bytes(&self) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        out[..32].copy_from_slice(&self.gamma);
        out[32..32 + CHALLENGE_LEN].copy_from_slice(&self.c);
        out[32 + CHALLENGE_LEN..].copy_from_slice(&self.s);
        out
    }

    /// Decode an 80-byte proof string and attach the `alpha` it claims to prove.
    ///
    /// Only the length is checked here; point and scalar validity are checked
    /// by [`crate::verify`].
    pub fn from_bytes(bytes: &[u8], alpha: impl Into<Vec<u8>>) -> Result<Self, VrfError> {
        if bytes.len() != PROOF_LEN {
            return Err(VrfError::InvalidLength {
                expected: PROOF_LEN,
                got: bytes.len(),
            });
        }
        let mut gamma = [0u8; 32];
        let mut c = [0u8; CHALLENGE_LEN];
        let mut s = [0u8; 32];
        gamma.copy_from_slice(&bytes[..32]);
        c.copy_from_slice(&bytes[32..32 + CHALLENGE_LEN]);
        s.copy_from_slice(&bytes[32 + CHALLENGE_LEN..]);
        Ok(Self {
            gamma,
            c,
            s,
            alpha: alpha.into(),
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str, alpha: impl Into<Vec<u8>>) -> Result<Self, VrfError> {
        let bytes = hex::decode(s.trim()).map_err(|e| VrfError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes, alpha)
    }
}

impl fmt::Debug for VrfProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VrfProof")
            .field("gamma", &hex::encode(self.gamma))
            .field("c", &hex::encode(self.c))
            .field("s", &hex::encode(self.s))
            .field("alpha_len", &self.alpha.len())
            .finish()
    }
}

/// The result of a prove or verify call.
///
/// `is_valid` is always set: `false` on any verification or computation
/// failure, in which case `beta` is the all-zero sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfOutput {
    pub beta: [u8; BETA_LEN],
    pub proof: VrfProof,
    pub is_valid: bool,
}

impl VrfOutput {
    /// An invalid output for `proof` carrying the zero sentinel.
    pub fn invalid(proof: VrfProof) -> Self {
        Self {
            beta: [0u8; BETA_LEN],
            proof,
            is_valid: false,
        }
    }

    pub fn beta_hex(&self) -> String {
        hex::encode(self.beta)
    }
}
