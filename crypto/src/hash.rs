//! Blake2b hashing for audit digests.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
///
/// Each part is prefixed with its length as a big-endian `u64`, so
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_deterministic() {
        let parts: [&[u8]; 3] = [b"match", &[1, 2, 3], b"winner"];
        assert_eq!(blake2b_256_multi(&parts), blake2b_256_multi(&parts));
    }

    #[test]
    fn multi_different_inputs() {
        assert_ne!(
            blake2b_256_multi(&[b"hello"]),
            blake2b_256_multi(&[b"world"])
        );
    }

    #[test]
    fn multi_empty_is_not_zero() {
        assert_ne!(blake2b_256_multi(&[]), [0u8; 32]);
        assert_ne!(blake2b_256_multi(&[]), blake2b_256_multi(&[b""]));
    }

    #[test]
    fn multi_is_framed() {
        let a = blake2b_256_multi(&[b"ab", b"c"]);
        let b = blake2b_256_multi(&[b"a", b"bc"]);
        assert_ne!(a, b);
    }
}
