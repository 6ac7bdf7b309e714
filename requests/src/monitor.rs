//! Background polling of pending requests.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{RequestService, ShutdownSignal};

/// Poll `service` every `poll_interval` until `shutdown` fires.
///
/// Each poll runs one [`RequestService::tick`] followed by
/// [`RequestService::purge_expired`].
pub async fn run(service: Arc<RequestService>, mut shutdown: broadcast::Receiver<ShutdownSignal>) {
    let mut interval = tokio::time::interval(service.config().poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            signal = shutdown.recv() => {
                let signal = signal.unwrap_or(ShutdownSignal::Requested);
                tracing::info!(%signal, pending = service.pending_count(), "request monitor stopped");
                break;
            }
            _ = interval.tick() => {
                let summary = service.tick();
                if summary.fulfilled + summary.timed_out + summary.failed > 0 {
                    tracing::debug!(
                        fulfilled = summary.fulfilled,
                        timed_out = summary.timed_out,
                        failed = summary.failed,
                        pending = summary.pending,
                        "request monitor tick"
                    );
                }
                service.purge_expired();
            }
        }
    }
}

/// Spawn [`run`] on the current tokio runtime.
pub fn spawn(service: Arc<RequestService>, shutdown: broadcast::Receiver<ShutdownSignal>) -> JoinHandle<()> {
    tokio::spawn(run(service, shutdown))
}
