//! Cryptographic helpers shared by the Fairplay crates.
//!
//! - **Blake2b-256** for audit digests (match verification hashes)
//! - **Constant-time equality** for comparing challenges and tags
//! - **OS randomness** for key and request-id generation

pub mod ct;
pub mod hash;
pub mod random;

pub use ct::constant_time_eq;
pub use hash::blake2b_256_multi;
pub use random::{random_array, RandomnessError};
