//! Weighted winner selection driven by VRF output.
//!
//! The VRF `beta` is treated as the key of a deterministic random stream.
//! Each winner slot draws a threshold in `[0, Σw)`, walks the cumulative
//! weights to the first positive-weight index that meets it, and rejects
//! indices that were already picked. Any node holding the same weights and
//! seed arrives at the same winners.

use crate::ecvrf::output_hash;
use crate::VrfError;

/// Rejection-sampling attempts per winner slot before falling back to the
/// first unselected index in natural order.
pub const MAX_ATTEMPTS_PER_SLOT: usize = 100;

const DRAW_LEN: usize = 4;
const DRAW_SPAN: f64 = 4_294_967_296.0; // 2^32

/// Deterministic stream of draws extracted from a seed.
///
/// Reads big-endian `u32`s from the seed buffer and re-hashes the buffer
/// with the VRF output-hash primitive whenever it runs dry.
#[derive(Clone, Debug)]
pub struct RandomStream {
    buffer: Vec<u8>,
    offset: usize,
}

impl RandomStream {
    /// Create a stream from a seed of at least 4 bytes.
    pub fn new(seed: &[u8]) -> Result<Self, VrfError> {
        if seed.len() < DRAW_LEN {
            return Err(VrfError::InvalidLength {
                expected: DRAW_LEN,
                got: seed.len(),
            });
        }
        Ok(Self {
            buffer: seed.to_vec(),
            offset: 0,
        })
    }

    pub fn next_u32(&mut self) -> u32 {
        if self.offset + DRAW_LEN > self.buffer.len() {
            self.buffer = output_hash(&self.buffer).to_vec();
            self.offset = 0;
        }
        let mut word = [0u8; DRAW_LEN];
        word.copy_from_slice(&self.buffer[self.offset..self.offset + DRAW_LEN]);
        self.offset += DRAW_LEN;
        u32::from_be_bytes(word)
    }

    /// Normalize a raw draw to `[0, 1)`.
    pub fn unit(word: u32) -> f64 {
        f64::from(word) / DRAW_SPAN
    }

    /// Next draw normalized to `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        Self::unit(self.next_u32())
    }

    /// Next draw in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        let scaled = (self.next_unit() * bound as f64) as usize;
        scaled.min(bound.saturating_sub(1))
    }
}

fn validate_weights(weights: &[f64], winner_count: usize) -> Result<(), VrfError> {
    if winner_count > weights.len() {
        return Err(VrfError::InvalidSelection(format!(
            "cannot select {} winners from {} participants",
            winner_count,
            weights.len()
        )));
    }
    if let Some((index, weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(VrfError::InvalidSelection(format!(
            "weight {} at index {} must be finite and non-negative",
            weight, index
        )));
    }
    Ok(())
}

/// Select `winner_count` distinct indices from `weights`, proportionally to
/// weight, using `seed` (normally the VRF `beta`) as the randomness.
///
/// Pure function of its arguments. Zero-weight entries are only ever picked
/// by the natural-order fallback, which also covers an all-zero weight list.
pub fn select_winners(
    weights: &[f64],
    winner_count: usize,
    seed: &[u8],
) -> Result<Vec<usize>, VrfError> {
    validate_weights(weights, winner_count)?;
    let mut stream = RandomStream::new(seed)?;

    let cumulative: Vec<f64> = weights
        .iter()
        .scan(0.0, |acc, w| {
            *acc += w;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);

    let mut taken = vec![false; weights.len()];
    let mut winners = Vec::with_capacity(winner_count);

    for slot in 0..winner_count {
        let mut pick = None;

        if total > 0.0 {
            for _ in 0..MAX_ATTEMPTS_PER_SLOT {
                let threshold = stream.next_unit() * total;
                let candidate = cumulative
                    .iter()
                    .zip(weights)
                    .position(|(&c, &w)| w > 0.0 && c >= threshold);
                if let Some(index) = candidate.filter(|&i| !taken[i]) {
                    pick = Some(index);
                    break;
                }
            }
        }

        let index = match pick {
            Some(index) => index,
            None => {
                let fallback = taken.iter().position(|t| !t).ok_or_else(|| {
                    VrfError::InvalidSelection("no unselected participant left".into())
                })?;
                tracing::debug!(slot, fallback, "winner selection fell back to natural order");
                fallback
            }
        };

        taken[index] = true;
        winners.push(index);
    }

    Ok(winners)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [0x5a; 32];

    #[test]
    fn stream_reads_big_endian_words() {
        let mut stream = RandomStream::new(&[0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff]).unwrap();
        assert_eq!(stream.next_u32(), 1);
        assert_eq!(stream.next_u32(), u32::MAX);
    }

    #[test]
    fn stream_rehashes_when_exhausted() {
        let seed = [7u8; 4];
        let mut stream = RandomStream::new(&seed).unwrap();
        stream.next_u32();
        let next = stream.next_u32();
        let expected = output_hash(&seed);
        assert_eq!(next.to_be_bytes(), expected[..4]);
    }

    #[test]
    fn stream_rejects_short_seed() {
        assert!(RandomStream::new(&[1, 2, 3]).is_err());
    }

    #[test]
    fn unit_draws_stay_below_one() {
        let mut stream = RandomStream::new(&[0xff; 32]).unwrap();
        for _ in 0..64 {
            let r = stream.next_unit();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut stream = RandomStream::new(&SEED).unwrap();
        for bound in 1..50 {
            assert!(stream.next_below(bound) < bound);
        }
    }

    #[test]
    fn selects_requested_number_of_distinct_winners() {
        let winners = select_winners(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, &SEED).unwrap();
        assert_eq!(winners.len(), 3);
        let mut unique = winners.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        assert!(winners.iter().all(|&i| i < 5));
    }

    #[test]
    fn selection_is_deterministic() {
        let weights = [10.0, 20.0, 70.0, 5.0];
        let a = select_winners(&weights, 2, &SEED).unwrap();
        let b = select_winners(&weights, 2, &SEED).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn select_all_returns_permutation() {
        let winners = select_winners(&[3.0, 1.0, 4.0, 1.0, 5.0], 5, &SEED).unwrap();
        let mut sorted = winners.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(select_winners(&[1.0, 2.0], 0, &SEED).unwrap().is_empty());
    }

    #[test]
    fn too_many_winners_rejected() {
        assert!(matches!(
            select_winners(&[1.0, 2.0], 3, &SEED),
            Err(VrfError::InvalidSelection(_))
        ));
    }

    #[test]
    fn negative_or_nan_weight_rejected() {
        assert!(select_winners(&[1.0, -2.0], 1, &SEED).is_err());
        assert!(select_winners(&[1.0, f64::NAN], 1, &SEED).is_err());
    }

    #[test]
    fn single_positive_weight_always_wins_first_slot() {
        let weights = [0.0, 0.0, 9.0, 0.0];
        let winners = select_winners(&weights, 2, &SEED).unwrap();
        assert_eq!(winners[0], 2);
        // Remaining slot can only be reached through the fallback.
        assert_eq!(winners[1], 0);
    }

    #[test]
    fn all_zero_weights_fall_back_to_natural_order() {
        let winners = select_winners(&[0.0, 0.0, 0.0], 3, &SEED).unwrap();
        assert_eq!(winners, vec![0, 1, 2]);
    }

    #[test]
    fn different_seeds_change_selection() {
        let weights: Vec<f64> = (0..20).map(|_| 1.0).collect();
        let a = select_winners(&weights, 5, &[0x10; 32]).unwrap();
        let b = select_winners(&weights, 5, &[0xc0; 32]).unwrap();
        assert_ne!(a, b);
    }
}
