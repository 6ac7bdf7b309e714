//! Stops the request monitor and the daemon's event log together.
//!
//! A stopped monitor no longer polls, so pending requests keep their state
//! and simply stop advancing; nothing is failed on the way out.

use std::fmt;

use tokio::signal;
use tokio::sync::broadcast;

/// Why the daemon is stopping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Requested,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Requested => "requested",
        })
    }
}

/// Hands out stop receivers to the monitor loop and event consumers.
///
/// [`monitor::run`](crate::monitor::run) selects on its receiver between
/// polls, so a stop never lands halfway through a tick.
pub struct ShutdownController {
    tx: broadcast::Sender<ShutdownSignal>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.tx.subscribe()
    }

    /// Stop every subscriber. Returns how many were listening.
    pub fn shutdown(&self) -> usize {
        self.notify(ShutdownSignal::Requested)
    }

    fn notify(&self, signal: ShutdownSignal) -> usize {
        let listeners = self.tx.send(signal).unwrap_or(0);
        tracing::info!(%signal, listeners, "stopping request monitor");
        listeners
    }

    /// Block until SIGINT or SIGTERM, stop every subscriber, and report
    /// which signal arrived.
    pub async fn wait_for_signal(&self) -> ShutdownSignal {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        let received = tokio::select! {
            _ = ctrl_c => ShutdownSignal::Interrupt,
            _ = terminate => ShutdownSignal::Terminate,
        };
        self.notify(received);
        received
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
