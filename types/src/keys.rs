//! VRF key material.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TypesError;

/// A 32-byte compressed Edwards point used as a VRF public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VrfPublicKey(pub [u8; 32]);

/// A 32-byte VRF secret key.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VrfSecretKey(pub [u8; 32]);

/// A VRF key pair (public + secret).
///
/// Use `fairplay_vrf::generate_keypair()` or `fairplay_vrf::keypair_from_secret()`
/// to construct key pairs; the public half is always derived from the secret.
pub struct VrfKeyPair {
    pub public: VrfPublicKey,
    pub secret: VrfSecretKey,
}

fn decode_32(s: &str) -> Result<[u8; 32], TypesError> {
    let bytes = hex::decode(s.trim()).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: 32,
            got: bytes.len(),
        })
}

impl VrfPublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_32(s).map(Self)
    }
}

impl fmt::Debug for VrfPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VrfPublicKey({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for VrfPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl VrfSecretKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a secret key from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_32(s).map(Self)
    }

    /// Hex-encode the secret. Only for export at the signing boundary; never log this.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_hex_roundtrip() {
        let pk = VrfPublicKey([7u8; 32]);
        assert_eq!(VrfPublicKey::from_hex(&pk.to_hex()).unwrap(), pk);
    }

    #[test]
    fn secret_key_rejects_short_hex() {
        let err = VrfSecretKey::from_hex("abcd").err().unwrap();
        assert_eq!(err, TypesError::InvalidLength { expected: 32, got: 2 });
    }

    #[test]
    fn public_key_rejects_bad_hex() {
        assert!(matches!(
            VrfPublicKey::from_hex("zz"),
            Err(TypesError::InvalidHex(_))
        ));
    }

    #[test]
    fn debug_shows_only_prefix() {
        let pk = VrfPublicKey([0xab; 32]);
        assert_eq!(format!("{:?}", pk), "VrfPublicKey(abababab)");
    }
}
