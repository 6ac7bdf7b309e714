//! The VRF request state machine.
//!
//! ```text
//! Pending ──(floor ≤ elapsed < ceiling, verified output)──▶ Fulfilled
//!    │
//!    ├──(elapsed ≥ ceiling)───────────────────────────────▶ Failed(Timeout)
//!    ├──(cancel_request)──────────────────────────────────▶ Failed(Cancelled)
//!    ├──(output fails verification)───────────────────────▶ Failed(RandomnessUnavailable)
//!    └──(output cannot be applied)────────────────────────▶ Failed(Rejected)
//! ```
//!
//! Terminal states never change. Provider errors and `Ok(None)` leave the
//! request pending until the ceiling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fairplay_crypto::random_array;
use fairplay_outcome::{
    roll_random_event, shuffle, validate_probability, MatchOutcome, OutcomeResolver,
};
use fairplay_types::{Clock, MatchId, Participant, PlayerId, RequestId, Timestamp};
use fairplay_utils::StatsCounter;
use fairplay_vrf::{RandomStream, VrfOutput, VrfProvider};
use tokio::sync::broadcast;

use crate::{
    FailureReason, RequestConfig, RequestError, RequestEvent, RequestKind, RequestResult,
    RequestStatus, VrfRequest,
};

pub const STAT_SUBMITTED: &str = "submitted";
pub const STAT_FULFILLED: &str = "fulfilled";
pub const STAT_TIMED_OUT: &str = "timed_out";
pub const STAT_CANCELLED: &str = "cancelled";
pub const STAT_FAILED: &str = "failed";

const STAT_NAMES: &[&str] = &[
    STAT_SUBMITTED,
    STAT_FULFILLED,
    STAT_TIMED_OUT,
    STAT_CANCELLED,
    STAT_FAILED,
];

/// What one [`RequestService::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub fulfilled: usize,
    pub timed_out: usize,
    pub failed: usize,
    /// Requests that are still pending after this tick.
    pub pending: usize,
}

/// A pending request as seen at the start of a tick.
struct PendingSnapshot {
    id: RequestId,
    alpha: Vec<u8>,
    created_at: Timestamp,
}

/// Accepts VRF requests and resolves them on a timed schedule.
///
/// All state sits behind short-lived `std::sync::Mutex` sections; the
/// provider is called with no lock held.
pub struct RequestService {
    config: RequestConfig,
    clock: Arc<dyn Clock>,
    provider: Arc<dyn VrfProvider>,
    requests: Mutex<HashMap<RequestId, VrfRequest>>,
    resolver: Mutex<OutcomeResolver>,
    events: broadcast::Sender<RequestEvent>,
    stats: StatsCounter,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RequestService {
    pub fn new(
        config: RequestConfig,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn VrfProvider>,
    ) -> Result<Self, RequestError> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        tracing::info!(
            provider = provider.name(),
            public_key = %provider.public_key(),
            min_delay_ms = config.min_resolution_delay_ms,
            max_delay_ms = config.max_resolution_delay_ms,
            "request service started"
        );
        Ok(Self {
            config,
            clock,
            provider,
            requests: Mutex::new(HashMap::new()),
            resolver: Mutex::new(OutcomeResolver::new()),
            events,
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn VrfProvider {
        self.provider.as_ref()
    }

    /// Lifecycle counters: `submitted`, `fulfilled`, `timed_out`, `cancelled`, `failed`.
    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Receive lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestEvent> {
        self.events.subscribe()
    }

    // ── Submission ─────────────────────────────────────────────────────

    /// Ask for the outcome of a two-participant match.
    pub fn request_outcome(
        &self,
        match_id: impl Into<MatchId>,
        requester_id: impl Into<PlayerId>,
        participants: [Participant; 2],
    ) -> Result<RequestId, RequestError> {
        let [first, second] = &participants;
        for p in [first, second] {
            if p.id.is_empty() || !p.is_well_formed() {
                return Err(RequestError::InvalidRequest(format!(
                    "participant '{}' has invalid scoring data",
                    p.id
                )));
            }
        }
        if first.id == second.id {
            return Err(RequestError::InvalidRequest(
                "participants must be distinct".into(),
            ));
        }
        self.submit(match_id.into(), requester_id.into(), RequestKind::Outcome { participants })
    }

    /// Ask whether an event with `probability` percent chance happens.
    pub fn request_random_event(
        &self,
        match_id: impl Into<MatchId>,
        requester_id: impl Into<PlayerId>,
        event_type: impl Into<String>,
        probability: f64,
    ) -> Result<RequestId, RequestError> {
        let event_type = event_type.into();
        if event_type.is_empty() {
            return Err(RequestError::InvalidRequest("event type is empty".into()));
        }
        validate_probability(probability)?;
        self.submit(
            match_id.into(),
            requester_id.into(),
            RequestKind::RandomEvent {
                event_type,
                probability,
            },
        )
    }

    /// Ask for a verifiable ordering of `items`.
    pub fn request_shuffle(
        &self,
        match_id: impl Into<MatchId>,
        requester_id: impl Into<PlayerId>,
        items: Vec<String>,
    ) -> Result<RequestId, RequestError> {
        if items.is_empty() {
            return Err(RequestError::InvalidRequest("nothing to shuffle".into()));
        }
        self.submit(match_id.into(), requester_id.into(), RequestKind::Shuffle { items })
    }

    fn submit(
        &self,
        match_id: MatchId,
        requester_id: PlayerId,
        kind: RequestKind,
    ) -> Result<RequestId, RequestError> {
        if match_id.is_empty() {
            return Err(RequestError::InvalidRequest("match id is empty".into()));
        }
        if requester_id.is_empty() {
            return Err(RequestError::InvalidRequest("requester id is empty".into()));
        }

        let id = RequestId::from_random(random_array()?);
        let label = kind.label();
        let request = VrfRequest::new(
            id.clone(),
            match_id.clone(),
            requester_id,
            kind,
            self.clock.now(),
        )?;

        lock(&self.requests).insert(id.clone(), request);
        self.stats.increment(STAT_SUBMITTED);
        tracing::info!(request_id = %id, match_id = %match_id, kind = label, "VRF request submitted");
        self.emit(RequestEvent::Submitted {
            request_id: id.clone(),
            match_id,
        });
        Ok(id)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn request_status(&self, id: &RequestId) -> Option<VrfRequest> {
        lock(&self.requests).get(id).cloned()
    }

    pub fn match_outcome(&self, match_id: &MatchId) -> Option<MatchOutcome> {
        lock(&self.resolver).outcome(match_id).cloned()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.requests).values().filter(|r| r.is_pending()).count()
    }

    pub fn len(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.requests).is_empty()
    }

    // ── Cancellation ───────────────────────────────────────────────────

    /// Cancel a pending request. Returns `false` (and changes nothing) if the
    /// request is unknown or already finished.
    pub fn cancel_request(&self, id: &RequestId) -> bool {
        let now = self.clock.now();
        let match_id = {
            let mut requests = lock(&self.requests);
            match requests.get_mut(id) {
                Some(request) if request.is_pending() => {
                    request.finish(RequestStatus::Failed(FailureReason::Cancelled), now);
                    request.match_id.clone()
                }
                _ => return false,
            }
        };
        self.stats.increment(STAT_CANCELLED);
        tracing::info!(request_id = %id, match_id = %match_id, "VRF request cancelled");
        self.emit(RequestEvent::Cancelled {
            request_id: id.clone(),
            match_id,
        });
        true
    }

    // ── Resolution ─────────────────────────────────────────────────────

    /// One monitor poll over every pending request.
    pub fn tick(&self) -> TickSummary {
        let now = self.clock.now();
        let pending: Vec<PendingSnapshot> = lock(&self.requests)
            .values()
            .filter(|r| r.is_pending())
            .map(|r| PendingSnapshot {
                id: r.id.clone(),
                alpha: r.alpha.clone(),
                created_at: r.created_at,
            })
            .collect();

        let mut summary = TickSummary::default();
        for snapshot in pending {
            let elapsed = snapshot.created_at.elapsed_since(now);
            if elapsed < self.config.min_resolution_delay_ms {
                continue;
            }
            if elapsed >= self.config.max_resolution_delay_ms {
                if self.time_out(&snapshot.id, now) {
                    summary.timed_out += 1;
                }
                continue;
            }
            match self.poll_provider(&snapshot, now) {
                Some(RequestStatus::Fulfilled) => summary.fulfilled += 1,
                Some(RequestStatus::Failed(_)) => summary.failed += 1,
                _ => {}
            }
        }
        summary.pending = self.pending_count();
        summary
    }

    fn time_out(&self, id: &RequestId, now: Timestamp) -> bool {
        let match_id = {
            let mut requests = lock(&self.requests);
            match requests.get_mut(id) {
                Some(request) if request.is_pending() => {
                    request.finish(RequestStatus::Failed(FailureReason::Timeout), now);
                    request.match_id.clone()
                }
                _ => return false,
            }
        };
        self.stats.increment(STAT_TIMED_OUT);
        tracing::warn!(request_id = %id, match_id = %match_id, "VRF request timed out");
        self.emit(RequestEvent::TimedOut {
            request_id: id.clone(),
            match_id,
        });
        true
    }

    /// Ask the provider for output and apply it. Returns the new status if
    /// the request left `Pending`.
    fn poll_provider(&self, snapshot: &PendingSnapshot, now: Timestamp) -> Option<RequestStatus> {
        if let Some(request) = lock(&self.requests).get_mut(&snapshot.id) {
            request.poll_count = request.poll_count.saturating_add(1);
        }

        let output = match self.provider.get_randomness(&snapshot.alpha) {
            Ok(Some(output)) => output,
            Ok(None) => {
                tracing::trace!(request_id = %snapshot.id, "randomness not yet available");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %snapshot.id,
                    provider = self.provider.name(),
                    error = %e,
                    "VRF provider error, will retry"
                );
                return None;
            }
        };

        if !output.is_valid || !self.provider.verify(&snapshot.alpha, &output) {
            tracing::warn!(
                request_id = %snapshot.id,
                provider = self.provider.name(),
                "VRF output failed verification"
            );
            let reason = FailureReason::RandomnessUnavailable("proof failed verification".into());
            return self.fail(&snapshot.id, reason, now);
        }

        self.fulfill(&snapshot.id, output, now)
    }

    /// Apply verified output to a pending request.
    ///
    /// The pending check, the resolver write and the state change happen
    /// under one `requests` guard, so a concurrent cancel either lands first
    /// (nothing is resolved) or finds the request already finished.
    fn fulfill(&self, id: &RequestId, output: VrfOutput, now: Timestamp) -> Option<RequestStatus> {
        let (match_id, label, applied) = {
            let mut requests = lock(&self.requests);
            let request = requests.get_mut(id).filter(|r| r.is_pending())?;
            let applied = self.apply(&request.match_id, &request.kind, &output.beta, now);
            match &applied {
                Ok(result) => {
                    request.result = Some(result.clone());
                    request.output = Some(output);
                    request.finish(RequestStatus::Fulfilled, now);
                }
                Err(e) => {
                    let reason = FailureReason::Rejected(e.to_string());
                    request.finish(RequestStatus::Failed(reason), now);
                }
            }
            (request.match_id.clone(), request.kind.label(), applied)
        };

        match applied {
            Ok(result) => {
                self.stats.increment(STAT_FULFILLED);
                tracing::info!(request_id = %id, match_id = %match_id, kind = label, "VRF request fulfilled");
                self.emit(RequestEvent::Fulfilled {
                    request_id: id.clone(),
                    match_id,
                    result,
                });
                Some(RequestStatus::Fulfilled)
            }
            Err(e) => {
                let reason = FailureReason::Rejected(e.to_string());
                self.report_failure(id, match_id, reason.clone());
                Some(RequestStatus::Failed(reason))
            }
        }
    }

    /// Turn verified `beta` into the result the request asked for.
    fn apply(
        &self,
        match_id: &MatchId,
        kind: &RequestKind,
        beta: &[u8],
        now: Timestamp,
    ) -> Result<RequestResult, RequestError> {
        Ok(match kind {
            RequestKind::Outcome { participants } => {
                let [first, second] = participants;
                let outcome = lock(&self.resolver).resolve(match_id, first, second, beta, now)?;
                RequestResult::Outcome(outcome)
            }
            RequestKind::RandomEvent {
                event_type,
                probability,
            } => {
                let draw = RandomStream::new(beta)?.next_unit();
                RequestResult::RandomEvent(roll_random_event(event_type, *probability, draw)?)
            }
            RequestKind::Shuffle { items } => RequestResult::Shuffle {
                items: shuffle(items, beta)?,
            },
        })
    }

    fn fail(&self, id: &RequestId, reason: FailureReason, now: Timestamp) -> Option<RequestStatus> {
        let match_id = {
            let mut requests = lock(&self.requests);
            let request = requests.get_mut(id).filter(|r| r.is_pending())?;
            request.finish(RequestStatus::Failed(reason.clone()), now);
            request.match_id.clone()
        };
        self.report_failure(id, match_id, reason.clone());
        Some(RequestStatus::Failed(reason))
    }

    fn report_failure(&self, id: &RequestId, match_id: MatchId, reason: FailureReason) {
        self.stats.increment(STAT_FAILED);
        tracing::warn!(request_id = %id, match_id = %match_id, reason = ?reason, "VRF request failed");
        self.emit(RequestEvent::Failed {
            request_id: id.clone(),
            match_id,
            reason,
        });
    }

    // ── Retention ──────────────────────────────────────────────────────

    /// Drop finished requests and match outcomes older than the audit
    /// retention window. Returns how many requests were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let retention = self.config.audit_retention_ms();
        let mut requests = lock(&self.requests);
        let before = requests.len();
        requests.retain(|_, r| match r.resolved_at {
            Some(at) if r.status.is_terminal() => !at.has_expired(retention, now),
            _ => true,
        });
        let removed = before - requests.len();
        let outcomes = lock(&self.resolver).purge_expired(retention, now);
        if removed > 0 || outcomes > 0 {
            tracing::debug!(removed, outcomes, "purged expired VRF requests");
        }
        removed
    }

    fn emit(&self, event: RequestEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairplay_nullables::{NullClock, NullRandom, NullRandomMode};

    fn service_with(random: NullRandom) -> (RequestService, Arc<NullClock>, Arc<NullRandom>) {
        let clock = Arc::new(NullClock::new(1_000_000));
        let random = Arc::new(random);
        let service = RequestService::new(
            RequestConfig::default(),
            clock.clone(),
            random.clone(),
        )
        .unwrap();
        (service, clock, random)
    }

    fn players() -> [Participant; 2] {
        [
            Participant::new("alice", 100.0, 80.0),
            Participant::new("bob", 100.0, 20.0),
        ]
    }

    #[test]
    fn request_id_has_prefix_and_is_pending() {
        let (service, _, _) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();
        assert!(id.as_str().starts_with(RequestId::PREFIX));
        assert_eq!(id.as_str().len(), RequestId::PREFIX.len() + 32);

        let request = service.request_status(&id).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.result.is_none());
        assert_eq!(service.pending_count(), 1);
        assert_eq!(service.stats().get(STAT_SUBMITTED), 1);
    }

    #[test]
    fn nothing_resolves_before_the_floor() {
        let (service, clock, random) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();

        for _ in 0..4 {
            clock.advance(1_000);
            service.tick();
        }
        clock.advance(999);
        service.tick();
        assert!(service.request_status(&id).unwrap().is_pending());
        assert_eq!(random.calls(), 0);

        clock.advance(1);
        let summary = service.tick();
        assert_eq!(summary.fulfilled, 1);
        let request = service.request_status(&id).unwrap();
        assert_eq!(request.status, RequestStatus::Fulfilled);
        assert_eq!(request.resolved_at, Some(Timestamp::from_millis(1_005_000)));
    }

    #[test]
    fn fulfilled_outcome_is_queryable_and_verifiable() {
        let (service, clock, random) = service_with(NullRandom::new([4u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);
        service.tick();

        let request = service.request_status(&id).unwrap();
        let output = request.output.clone().unwrap();
        assert!(random.verify(&request.alpha, &output));

        let Some(RequestResult::Outcome(outcome)) = request.result else {
            panic!("expected an outcome result");
        };
        assert_eq!(service.match_outcome(&MatchId::new("m1")), Some(outcome.clone()));
        assert!(outcome.winner.as_str() == "alice" || outcome.winner.as_str() == "bob");
        assert_eq!(service.stats().get(STAT_FULFILLED), 1);
    }

    #[test]
    fn withheld_randomness_times_out_at_ceiling() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]).withholding(usize::MAX));
        let id = service.request_random_event("m1", "ref", "storm", 50.0).unwrap();

        clock.advance(29_999);
        service.tick();
        assert!(service.request_status(&id).unwrap().is_pending());

        clock.advance(1);
        let summary = service.tick();
        assert_eq!(summary.timed_out, 1);
        assert_eq!(
            service.request_status(&id).unwrap().status,
            RequestStatus::Failed(FailureReason::Timeout)
        );
        assert_eq!(service.stats().get(STAT_TIMED_OUT), 1);
    }

    #[test]
    fn provider_errors_keep_request_pending() {
        let (service, clock, random) =
            service_with(NullRandom::new([1u8; 32]).with_mode(NullRandomMode::Failing));
        let id = service.request_shuffle("m1", "ref", vec!["a".into(), "b".into()]).unwrap();
        clock.advance(6_000);
        service.tick();
        let request = service.request_status(&id).unwrap();
        assert!(request.is_pending());
        assert_eq!(request.poll_count, 1);

        random.set_mode(NullRandomMode::Honest);
        clock.advance(1_000);
        service.tick();
        assert_eq!(service.request_status(&id).unwrap().status, RequestStatus::Fulfilled);
    }

    #[test]
    fn tampered_output_fails_request() {
        let (service, clock, _) =
            service_with(NullRandom::new([1u8; 32]).with_mode(NullRandomMode::Tampered));
        let id = service.request_random_event("m1", "ref", "storm", 50.0).unwrap();
        clock.advance(5_000);
        let summary = service.tick();
        assert_eq!(summary.failed, 1);
        let request = service.request_status(&id).unwrap();
        assert!(matches!(
            request.status,
            RequestStatus::Failed(FailureReason::RandomnessUnavailable(_))
        ));
        assert!(request.result.is_none());
    }

    #[test]
    fn cancel_is_idempotent() {
        let (service, clock, random) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();

        assert!(service.cancel_request(&id));
        assert!(!service.cancel_request(&id));
        assert_eq!(
            service.request_status(&id).unwrap().status,
            RequestStatus::Failed(FailureReason::Cancelled)
        );

        clock.advance(10_000);
        service.tick();
        assert_eq!(random.calls(), 0);
        assert_eq!(service.stats().get(STAT_CANCELLED), 1);
        assert!(service.match_outcome(&MatchId::new("m1")).is_none());
    }

    #[test]
    fn cancel_before_late_output_leaves_match_undecided() {
        let (service, clock, random) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);

        // Output fetched while pending, applied after the cancel landed.
        let alpha = service.request_status(&id).unwrap().alpha;
        let output = random.get_randomness(&alpha).unwrap().unwrap();
        assert!(service.cancel_request(&id));

        assert_eq!(service.fulfill(&id, output, clock.now()), None);
        let request = service.request_status(&id).unwrap();
        assert_eq!(request.status, RequestStatus::Failed(FailureReason::Cancelled));
        assert!(request.result.is_none());
        assert!(service.match_outcome(&MatchId::new("m1")).is_none());
        assert_eq!(service.stats().get(STAT_FULFILLED), 0);

        // The match can still be decided by a fresh request.
        let retry = service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);
        service.tick();
        assert_eq!(service.request_status(&retry).unwrap().status, RequestStatus::Fulfilled);
        assert!(service.match_outcome(&MatchId::new("m1")).is_some());
    }

    #[test]
    fn fulfilled_outcome_survives_late_cancel() {
        let (service, clock, random) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);

        let alpha = service.request_status(&id).unwrap().alpha;
        let output = random.get_randomness(&alpha).unwrap().unwrap();
        assert_eq!(
            service.fulfill(&id, output, clock.now()),
            Some(RequestStatus::Fulfilled)
        );
        assert!(!service.cancel_request(&id));

        let request = service.request_status(&id).unwrap();
        assert_eq!(request.status, RequestStatus::Fulfilled);
        let Some(RequestResult::Outcome(outcome)) = request.result else {
            panic!("expected an outcome result");
        };
        assert_eq!(service.match_outcome(&MatchId::new("m1")), Some(outcome));
        assert_eq!(service.stats().get(STAT_CANCELLED), 0);
    }

    #[test]
    fn cannot_cancel_finished_or_unknown() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]));
        let id = service.request_random_event("m1", "ref", "storm", 50.0).unwrap();
        clock.advance(5_000);
        service.tick();
        assert!(!service.cancel_request(&id));
        assert_eq!(service.request_status(&id).unwrap().status, RequestStatus::Fulfilled);
        assert!(!service.cancel_request(&RequestId::new("req_missing")));
    }

    #[test]
    fn second_outcome_for_match_is_rejected() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]));
        let first = service.request_outcome("m1", "ref", players()).unwrap();
        let second = service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);
        let summary = service.tick();
        assert_eq!(summary.fulfilled, 1);
        assert_eq!(summary.failed, 1);

        let statuses = [
            service.request_status(&first).unwrap().status,
            service.request_status(&second).unwrap().status,
        ];
        assert!(statuses.contains(&RequestStatus::Fulfilled));
        assert!(statuses
            .iter()
            .any(|s| matches!(s, RequestStatus::Failed(FailureReason::Rejected(_)))));
    }

    #[test]
    fn invalid_submissions_rejected() {
        let (service, _, _) = service_with(NullRandom::new([1u8; 32]));
        assert!(service.request_random_event("m1", "ref", "storm", 101.0).is_err());
        assert!(service.request_random_event("m1", "ref", "", 10.0).is_err());
        assert!(service.request_random_event("", "ref", "storm", 10.0).is_err());
        assert!(service.request_shuffle("m1", "ref", Vec::new()).is_err());

        let same = [
            Participant::new("alice", 1.0, 1.0),
            Participant::new("alice", 2.0, 2.0),
        ];
        assert!(service.request_outcome("m1", "ref", same).is_err());
        let negative = [
            Participant::new("alice", -1.0, 1.0),
            Participant::new("bob", 2.0, 2.0),
        ];
        assert!(service.request_outcome("m1", "ref", negative).is_err());
        assert_eq!(service.len(), 0);
    }

    #[test]
    fn events_follow_lifecycle() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]));
        let mut rx = service.subscribe();
        let id = service.request_random_event("m1", "ref", "storm", 100.0).unwrap();
        clock.advance(5_000);
        service.tick();

        assert!(matches!(rx.try_recv().unwrap(), RequestEvent::Submitted { .. }));
        match rx.try_recv().unwrap() {
            RequestEvent::Fulfilled {
                request_id,
                result: RequestResult::RandomEvent(roll),
                ..
            } => {
                assert_eq!(request_id, id);
                assert!(roll.triggered);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn purge_keeps_pending_and_recent() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]));
        let done = service.request_random_event("m1", "ref", "storm", 10.0).unwrap();
        clock.advance(5_000);
        service.tick();
        let pending = service.request_random_event("m2", "ref", "storm", 10.0).unwrap();

        clock.advance(3_599_999);
        assert_eq!(service.purge_expired(), 0);
        clock.advance(1);
        // `pending` has passed its ceiling but was never ticked, so it stays.
        assert_eq!(service.purge_expired(), 1);
        assert!(service.request_status(&done).is_none());
        assert!(service.request_status(&pending).is_some());
    }

    #[test]
    fn purge_forgets_old_match_outcomes() {
        let (service, clock, _) = service_with(NullRandom::new([1u8; 32]));
        service.request_outcome("m1", "ref", players()).unwrap();
        clock.advance(5_000);
        service.tick();
        let m1 = MatchId::new("m1");
        assert!(service.match_outcome(&m1).is_some());

        clock.advance(3_599_999);
        service.purge_expired();
        assert!(service.match_outcome(&m1).is_some());

        clock.advance(1);
        assert_eq!(service.purge_expired(), 1);
        assert!(service.match_outcome(&m1).is_none());
    }
}
