//! Two-participant outcome resolution.
//!
//! Each side's strength is `score * (1 + confidence / 100)`; participant one
//! wins when the VRF draw falls below its share of the combined strength.

use std::collections::HashMap;

use fairplay_crypto::blake2b_256_multi;
use fairplay_types::{MatchId, Participant, PlayerId, Timestamp};
use fairplay_vrf::RandomStream;
use serde::{Deserialize, Serialize};

use crate::OutcomeError;

/// Lower bound of the reported outcome confidence.
pub const MIN_OUTCOME_CONFIDENCE: f64 = 50.0;
/// Upper bound of the reported outcome confidence.
pub const MAX_OUTCOME_CONFIDENCE: f64 = 95.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// Decided from participant scores weighted by the VRF draw.
    Decision,
}

/// The resolved outcome of a match. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: MatchId,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub method: ResolutionMethod,
    /// Confidence in the outcome, `50..=95`.
    pub confidence: u8,
    /// Integer seed extracted from the VRF output.
    pub random_seed: u32,
    /// Audit digest over match, seed, winner and resolution time.
    ///
    /// Fairness is established by the VRF proof, not by this hash.
    pub verification_hash: String,
    pub resolved_at: Timestamp,
}

pub fn strength(participant: &Participant) -> f64 {
    participant.score * (1.0 + participant.confidence / 100.0)
}

/// Probability that participant one wins. Even odds when both strengths are zero.
pub fn win_probability(first: &Participant, second: &Participant) -> f64 {
    let (s1, s2) = (strength(first), strength(second));
    let total = s1 + s2;
    if total <= 0.0 {
        return 0.5;
    }
    s1 / total
}

/// Outcome confidence from the strength gap, bounded to `[50, 95]`.
pub fn outcome_confidence(first: &Participant, second: &Participant) -> u8 {
    let (s1, s2) = (strength(first), strength(second));
    let total = s1 + s2;
    let gap = if total > 0.0 { (s1 - s2).abs() / total } else { 0.0 };
    let confidence = MIN_OUTCOME_CONFIDENCE + (MAX_OUTCOME_CONFIDENCE - MIN_OUTCOME_CONFIDENCE) * gap;
    confidence
        .round()
        .clamp(MIN_OUTCOME_CONFIDENCE, MAX_OUTCOME_CONFIDENCE) as u8
}

/// Hex Blake2b-256 over `match_id || random_seed || winner || resolved_at`.
pub fn verification_hash(
    match_id: &MatchId,
    random_seed: u32,
    winner: &PlayerId,
    resolved_at: Timestamp,
) -> String {
    let digest = blake2b_256_multi(&[
        match_id.as_str().as_bytes(),
        &random_seed.to_be_bytes(),
        winner.as_str().as_bytes(),
        &resolved_at.as_millis().to_be_bytes(),
    ]);
    hex::encode(digest)
}

fn validate(first: &Participant, second: &Participant) -> Result<(), OutcomeError> {
    for p in [first, second] {
        if p.id.is_empty() {
            return Err(OutcomeError::InvalidParticipant("empty participant id".into()));
        }
        if !p.is_well_formed() {
            return Err(OutcomeError::InvalidParticipant(format!(
                "{}: score must be finite and non-negative, confidence within 0..=100",
                p.id
            )));
        }
    }
    if first.id == second.id {
        return Err(OutcomeError::InvalidParticipant(format!(
            "{} cannot play against itself",
            first.id
        )));
    }
    Ok(())
}

/// Decide a match from an already-normalized draw in `[0, 1)`.
pub fn decide_with_draw(
    match_id: &MatchId,
    first: &Participant,
    second: &Participant,
    draw: f64,
    random_seed: u32,
    resolved_at: Timestamp,
) -> Result<MatchOutcome, OutcomeError> {
    validate(first, second)?;

    let p1 = win_probability(first, second);
    let (winner, loser) = if draw < p1 {
        (first, second)
    } else {
        (second, first)
    };

    Ok(MatchOutcome {
        match_id: match_id.clone(),
        winner: winner.id.clone(),
        loser: loser.id.clone(),
        method: ResolutionMethod::Decision,
        confidence: outcome_confidence(first, second),
        random_seed,
        verification_hash: verification_hash(match_id, random_seed, &winner.id, resolved_at),
        resolved_at,
    })
}

/// Decide a match from verified VRF output.
///
/// The seed is the first big-endian `u32` of `beta`; the draw is that seed
/// normalized to `[0, 1)`.
pub fn decide(
    match_id: &MatchId,
    first: &Participant,
    second: &Participant,
    beta: &[u8],
    resolved_at: Timestamp,
) -> Result<MatchOutcome, OutcomeError> {
    let random_seed = RandomStream::new(beta)?.next_u32();
    let draw = RandomStream::unit(random_seed);
    decide_with_draw(match_id, first, second, draw, random_seed, resolved_at)
}

/// Resolves matches at most once each.
///
/// The request service does not deduplicate by match; this does. Outcomes
/// are held for the owner's retention window ([`purge_expired`](Self::purge_expired));
/// long-term history belongs in an external store.
#[derive(Debug, Default)]
pub struct OutcomeResolver {
    outcomes: HashMap<MatchId, MatchOutcome>,
}

impl OutcomeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide `match_id` and remember the outcome.
    ///
    /// Fails with [`OutcomeError::AlreadyResolved`] if the match already has one.
    pub fn resolve(
        &mut self,
        match_id: &MatchId,
        first: &Participant,
        second: &Participant,
        beta: &[u8],
        resolved_at: Timestamp,
    ) -> Result<MatchOutcome, OutcomeError> {
        if self.outcomes.contains_key(match_id) {
            return Err(OutcomeError::AlreadyResolved(match_id.clone()));
        }
        let outcome = decide(match_id, first, second, beta, resolved_at)?;
        tracing::info!(
            match_id = %match_id,
            winner = %outcome.winner,
            confidence = outcome.confidence,
            random_seed = outcome.random_seed,
            "match resolved"
        );
        self.outcomes.insert(match_id.clone(), outcome.clone());
        Ok(outcome)
    }

    pub fn outcome(&self, match_id: &MatchId) -> Option<&MatchOutcome> {
        self.outcomes.get(match_id)
    }

    pub fn is_resolved(&self, match_id: &MatchId) -> bool {
        self.outcomes.contains_key(match_id)
    }

    /// Forget outcomes resolved at least `retention_ms` before `now`.
    /// Returns how many were dropped.
    pub fn purge_expired(&mut self, retention_ms: u64, now: Timestamp) -> usize {
        let before = self.outcomes.len();
        self.outcomes
            .retain(|_, o| !o.resolved_at.has_expired(retention_ms, now));
        before - self.outcomes.len()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
