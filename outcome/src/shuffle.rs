//! Verifiable shuffles.
//!
//! Fisher-Yates from the last position down, each swap index drawn from a
//! [`RandomStream`] keyed by the VRF output. The same `beta` always gives
//! the same permutation.

use fairplay_vrf::RandomStream;

use crate::OutcomeError;

/// Permutation of `0..len` derived from `seed`.
pub fn shuffle_indices(len: usize, seed: &[u8]) -> Result<Vec<usize>, OutcomeError> {
    let mut stream = RandomStream::new(seed)?;
    let mut indices: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = stream.next_below(i + 1);
        indices.swap(i, j);
    }
    Ok(indices)
}

/// Shuffle a copy of `items` using `seed`.
pub fn shuffle<T: Clone>(items: &[T], seed: &[u8]) -> Result<Vec<T>, OutcomeError> {
    Ok(shuffle_indices(items.len(), seed)?
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}
