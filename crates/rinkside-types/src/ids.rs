//! Short string identifiers for penalties and game events.
//!
//! The browser scoreboard stores ids as 7-character base-36 strings, and
//! persisted or imported documents carry them verbatim. The wrappers here
//! keep that wire shape while preventing a penalty id from being passed
//! where an event id is expected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Alphabet used for freshly generated ids.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a freshly generated id.
const ID_LEN: usize = 7;

/// Generate a random base-36 id of [`ID_LEN`] characters.
fn random_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .filter_map(|_| {
            let idx = rng.random_range(0..ID_ALPHABET.len());
            ID_ALPHABET.get(idx).map(|&b| char::from(b))
        })
        .collect()
}

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(random_id())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for an active penalty.
    PenaltyId
}

define_id! {
    /// Unique identifier for an entry in the game event log.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_base36() {
        let id = PenaltyId::new();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(
            id.as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        );
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = EventId::from("k3j9x2a");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"k3j9x2a\""));
    }

    #[test]
    fn generated_ids_differ() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }
}
