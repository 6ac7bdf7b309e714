//! Lifecycle events published by the request service.

use fairplay_types::{MatchId, RequestId};
use serde::{Deserialize, Serialize};

use crate::{FailureReason, RequestResult};

/// Emitted on every request state change over a `tokio::sync::broadcast`
/// channel. Slow subscribers may miss events; the request record stays the
/// source of truth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RequestEvent {
    Submitted {
        request_id: RequestId,
        match_id: MatchId,
    },
    Fulfilled {
        request_id: RequestId,
        match_id: MatchId,
        result: RequestResult,
    },
    TimedOut {
        request_id: RequestId,
        match_id: MatchId,
    },
    Failed {
        request_id: RequestId,
        match_id: MatchId,
        reason: FailureReason,
    },
    Cancelled {
        request_id: RequestId,
        match_id: MatchId,
    },
}

impl RequestEvent {
    pub fn request_id(&self) -> &RequestId {
        match self {
            RequestEvent::Submitted { request_id, .. }
            | RequestEvent::Fulfilled { request_id, .. }
            | RequestEvent::TimedOut { request_id, .. }
            | RequestEvent::Failed { request_id, .. }
            | RequestEvent::Cancelled { request_id, .. } => request_id,
        }
    }
}
