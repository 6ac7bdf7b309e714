//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The request service reaches time and randomness only through the
//! [`Clock`](fairplay_types::Clock) and [`VrfProvider`](fairplay_vrf::VrfProvider)
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the operating system clock or entropy source
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod random;

pub use clock::NullClock;
pub use random::{NullRandom, NullRandomMode};
