//! Request records and their lifecycle states.

use fairplay_outcome::{MatchOutcome, RandomEventResult};
use fairplay_types::{MatchId, Participant, PlayerId, RequestId, Timestamp};
use fairplay_vrf::VrfOutput;
use serde::{Deserialize, Serialize};

use crate::RequestError;

/// Domain tag at the start of every committed request input.
pub const ALPHA_DOMAIN: &[u8] = b"fairplay-vrf-request";

/// What a request asks the randomness for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestKind {
    /// Decide the winner between two participants.
    Outcome { participants: [Participant; 2] },
    /// Roll whether an in-match event happens.
    RandomEvent { event_type: String, probability: f64 },
    /// Produce a verifiable permutation of `items`.
    Shuffle { items: Vec<String> },
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Outcome { .. } => "outcome",
            RequestKind::RandomEvent { .. } => "random_event",
            RequestKind::Shuffle { .. } => "shuffle",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// Still pending when the resolution ceiling passed.
    Timeout,
    /// Cancelled by the caller while pending.
    Cancelled,
    /// The provider returned output that does not verify.
    RandomnessUnavailable(String),
    /// Verified output could not be applied (e.g. the match already has an outcome).
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Failed(FailureReason),
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestResult {
    Outcome(MatchOutcome),
    RandomEvent(RandomEventResult),
    Shuffle { items: Vec<String> },
}

/// A VRF request as tracked by the request service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VrfRequest {
    pub id: RequestId,
    pub match_id: MatchId,
    pub requester_id: PlayerId,
    pub kind: RequestKind,
    /// The committed VRF input. Fixed at submission.
    pub alpha: Vec<u8>,
    pub created_at: Timestamp,
    pub status: RequestStatus,
    pub result: Option<RequestResult>,
    /// The verified VRF output the result was derived from, kept for audit.
    pub output: Option<VrfOutput>,
    pub resolved_at: Option<Timestamp>,
    /// How many times the provider was asked for this request.
    pub poll_count: u32,
}

impl VrfRequest {
    pub fn new(
        id: RequestId,
        match_id: MatchId,
        requester_id: PlayerId,
        kind: RequestKind,
        created_at: Timestamp,
    ) -> Result<Self, RequestError> {
        let alpha = build_alpha(&id, &match_id, &requester_id, &kind)?;
        Ok(Self {
            id,
            match_id,
            requester_id,
            kind,
            alpha,
            created_at,
            status: RequestStatus::Pending,
            result: None,
            output: None,
            resolved_at: None,
            poll_count: 0,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Move to a terminal state. Terminal requests never change again.
    pub(crate) fn finish(&mut self, status: RequestStatus, at: Timestamp) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.resolved_at = Some(at);
    }
}

/// Build the committed input for a request.
///
/// `domain || id || match || requester || json(kind)`, each field prefixed
/// with its big-endian `u32` length so no two requests share an encoding.
pub fn build_alpha(
    id: &RequestId,
    match_id: &MatchId,
    requester_id: &PlayerId,
    kind: &RequestKind,
) -> Result<Vec<u8>, RequestError> {
    let payload = serde_json::to_vec(kind)?;
    let parts: [&[u8]; 5] = [
        ALPHA_DOMAIN,
        id.as_str().as_bytes(),
        match_id.as_str().as_bytes(),
        requester_id.as_str().as_bytes(),
        &payload,
    ];
    let mut alpha = Vec::with_capacity(parts.iter().map(|p| p.len() + 4).sum());
    for part in parts {
        alpha.extend_from_slice(&(part.len() as u32).to_be_bytes());
        alpha.extend_from_slice(part);
    }
    Ok(alpha)
}
