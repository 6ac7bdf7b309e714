//! VRF key generation.

use curve25519_dalek::edwards::EdwardsPoint;
use fairplay_crypto::random_array;
use fairplay_types::{VrfKeyPair, VrfPublicKey, VrfSecretKey};

use crate::ecvrf::expand_secret;
use crate::VrfError;

/// Generate a new VRF key pair from the OS randomness source.
///
/// Fails only if the randomness source fails; there is no fallback.
pub fn generate_keypair() -> Result<VrfKeyPair, VrfError> {
    let secret = VrfSecretKey(random_array::<32>()?);
    Ok(keypair_from_secret(secret))
}

/// Derive the public key `x * G` from a secret key.
pub fn public_from_secret(secret: &VrfSecretKey) -> VrfPublicKey {
    let expanded = expand_secret(secret);
    VrfPublicKey(EdwardsPoint::mul_base(&expanded.scalar).compress().to_bytes())
}

/// Build a full key pair from a secret key (deterministic).
pub fn keypair_from_secret(secret: VrfSecretKey) -> VrfKeyPair {
    let public = public_from_secret(&secret);
    VrfKeyPair { public, secret }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = generate_keypair().unwrap();
        assert_ne!(kp.public.0, [0u8; 32]);
        assert_ne!(kp.secret.0, [0u8; 32]);
    }

    #[test]
    fn public_from_secret_is_deterministic() {
        let kp = generate_keypair().unwrap();
        assert_eq!(public_from_secret(&kp.secret), kp.public);
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let a = keypair_from_secret(VrfSecretKey([1u8; 32]));
        let b = keypair_from_secret(VrfSecretKey([2u8; 32]));
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = generate_keypair().unwrap();
        let b = generate_keypair().unwrap();
        assert_ne!(a.public, b.public);
    }
}
