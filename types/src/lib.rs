//! Fundamental types for the Fairplay VRF subsystem.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! match/request/player identifiers, VRF key material, timestamps and the
//! injectable clock, and scored participants.

pub mod error;
pub mod ids;
pub mod keys;
pub mod participant;
pub mod time;

pub use error::TypesError;
pub use ids::{MatchId, PlayerId, RequestId};
pub use keys::{VrfKeyPair, VrfPublicKey, VrfSecretKey};
pub use participant::Participant;
pub use time::{Clock, SystemClock, Timestamp};
