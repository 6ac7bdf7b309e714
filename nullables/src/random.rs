//! Nullable random: a deterministic VRF provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use fairplay_types::{VrfKeyPair, VrfPublicKey, VrfSecretKey};
use fairplay_vrf::{keypair_from_secret, prove, VrfError, VrfOutput, VrfProvider};

/// How a [`NullRandom`] answers once it stops withholding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullRandomMode {
    /// Real ECVRF proofs under the seeded key.
    Honest,
    /// Every call fails with [`VrfError::Unavailable`].
    Failing,
    /// Real proofs with one bit of `beta` flipped, so verification fails.
    Tampered,
}

/// A deterministic VRF provider for testing.
///
/// The key pair is derived from a fixed seed, so outputs are reproducible
/// across runs. It can withhold randomness for the first N polls of each
/// input, fail outright, or hand back tampered outputs.
pub struct NullRandom {
    keypair: VrfKeyPair,
    mode: Mutex<NullRandomMode>,
    withhold_polls: usize,
    polls: Mutex<HashMap<Vec<u8>, usize>>,
    calls: AtomicUsize,
}

impl NullRandom {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            keypair: keypair_from_secret(VrfSecretKey(seed)),
            mode: Mutex::new(NullRandomMode::Honest),
            withhold_polls: 0,
            polls: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer `Ok(None)` for the first `polls` requests of each input.
    pub fn withholding(mut self, polls: usize) -> Self {
        self.withhold_polls = polls;
        self
    }

    pub fn with_mode(self, mode: NullRandomMode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn set_mode(&self, mode: NullRandomMode) {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Total number of `get_randomness` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VrfProvider for NullRandom {
    fn get_randomness(&self, alpha: &[u8]) -> Result<Option<VrfOutput>, VrfError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        {
            let mut polls = self.polls.lock().unwrap_or_else(PoisonError::into_inner);
            let seen = polls.entry(alpha.to_vec()).or_insert(0);
            *seen += 1;
            if *seen <= self.withhold_polls {
                return Ok(None);
            }
        }

        let mode = *self.mode.lock().unwrap_or_else(PoisonError::into_inner);
        match mode {
            NullRandomMode::Honest => prove(&self.keypair.secret, alpha).map(Some),
            NullRandomMode::Failing => Err(VrfError::Unavailable("null-random set to fail".into())),
            NullRandomMode::Tampered => {
                let mut output = prove(&self.keypair.secret, alpha)?;
                output.beta[0] ^= 0x01;
                Ok(Some(output))
            }
        }
    }

    fn public_key(&self) -> VrfPublicKey {
        self.keypair.public
    }

    fn name(&self) -> &str {
        "null-random"
    }
}
