//! VRF request lifecycle.
//!
//! A request commits its input (`alpha`) at submission, then waits at least
//! the resolution floor before the monitor asks the VRF provider for output.
//! Requests still pending at the ceiling time out. Verified output is turned
//! into a match outcome, a random-event roll or a shuffle.
//!
//! - [`config`]: timing and retention settings, loadable from TOML
//! - [`request`]: request records, payloads, statuses and results
//! - [`service`]: the [`RequestService`] state machine
//! - [`monitor`]: the tokio task that polls the service
//! - [`shutdown`]: stops the monitor on SIGINT/SIGTERM

pub mod config;
pub mod error;
pub mod event;
pub mod monitor;
pub mod request;
pub mod service;
pub mod shutdown;

pub use config::RequestConfig;
pub use error::RequestError;
pub use event::RequestEvent;
pub use request::{FailureReason, RequestKind, RequestResult, RequestStatus, VrfRequest};
pub use service::{RequestService, TickSummary};
pub use shutdown::{ShutdownController, ShutdownSignal};
