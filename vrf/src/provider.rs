//! The randomness seam used by the request service.

use std::time::Duration;

use fairplay_types::{VrfKeyPair, VrfPublicKey};

use crate::ecvrf::{prove_with_budget, verify, DEFAULT_PROVE_BUDGET};
use crate::{generate_keypair, VrfError, VrfOutput};

/// Trait for providing verifiable randomness.
pub trait VrfProvider: Send + Sync {
    /// Produce VRF output for `alpha`.
    ///
    /// `Ok(None)` means fresh randomness is not available yet and the caller
    /// should ask again on a later poll.
    fn get_randomness(&self, alpha: &[u8]) -> Result<Option<VrfOutput>, VrfError>;

    /// The public key outputs of this provider verify under.
    fn public_key(&self) -> VrfPublicKey;

    /// Human-readable name of this VRF provider.
    fn name(&self) -> &str;

    /// Check an output against this provider's public key.
    ///
    /// Accepts only if the proof verifies for `alpha` and the claimed `beta`
    /// is the one the proof commits to.
    fn verify(&self, alpha: &[u8], output: &VrfOutput) -> bool {
        let checked = verify(&self.public_key(), &output.proof, alpha);
        checked.is_valid && checked.beta == output.beta
    }
}

/// VRF provider backed by a locally held key pair.
pub struct LocalVrf {
    keypair: VrfKeyPair,
    prove_budget: Duration,
}

impl LocalVrf {
    pub fn new(keypair: VrfKeyPair) -> Self {
        Self {
            keypair,
            prove_budget: DEFAULT_PROVE_BUDGET,
        }
    }

    /// Create a provider with a freshly generated key pair.
    pub fn generate() -> Result<Self, VrfError> {
        Ok(Self::new(generate_keypair()?))
    }

    pub fn with_prove_budget(mut self, budget: Duration) -> Self {
        self.prove_budget = budget;
        self
    }
}

impl VrfProvider for LocalVrf {
    fn get_randomness(&self, alpha: &[u8]) -> Result<Option<VrfOutput>, VrfError> {
        prove_with_budget(&self.keypair.secret, alpha, self.prove_budget).map(Some)
    }

    fn public_key(&self) -> VrfPublicKey {
        self.keypair.public
    }

    fn name(&self) -> &str {
        "local-ecvrf"
    }
}
