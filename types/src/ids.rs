//! Opaque string identifiers for matches, players and VRF requests.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id!(
    /// Identifier of a match whose outcome or events are being randomized.
    MatchId
);

string_id!(
    /// Identifier of a player (or any participant/requester) in a match.
    PlayerId
);

string_id!(
    /// Identifier of a VRF request, always prefixed with `req_`.
    RequestId
);

impl RequestId {
    /// The prefix carried by every request id issued by the request service.
    pub const PREFIX: &'static str = "req_";

    /// Build a request id from 16 random bytes.
    pub fn from_random(bytes: [u8; 16]) -> Self {
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_from_random_has_prefix() {
        let id = RequestId::from_random([0xab; 16]);
        assert!(id.as_str().starts_with(RequestId::PREFIX));
        assert_eq!(id.as_str().len(), RequestId::PREFIX.len() + 32);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = MatchId::new("match-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"match-42\"");
    }

    #[test]
    fn display_matches_raw() {
        assert_eq!(PlayerId::from("alice").to_string(), "alice");
    }
}
