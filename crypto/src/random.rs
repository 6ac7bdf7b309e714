//! Operating-system randomness.
//!
//! There is no fallback source: if the OS cannot provide entropy the caller
//! must abort whatever it was doing.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("operating system randomness unavailable: {0}")]
pub struct RandomnessError(String);

/// Fill a fixed-size array from the OS randomness source.
pub fn random_array<const N: usize>() -> Result<[u8; N], RandomnessError> {
    let mut out = [0u8; N];
    getrandom::getrandom(&mut out).map_err(|e| RandomnessError(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_arrays_differ() {
        let a: [u8; 32] = random_array().unwrap();
        let b: [u8; 32] = random_array().unwrap();
        assert_ne!(a, b);
    }
}
