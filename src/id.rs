//! Identifier newtypes.
//!
//! Fixture records are keyed by short human-authored strings (`"a1"`,
//! `"sarah"`), so identifiers wrap a `String` rather than a generated UUID.
//! Each kind gets its own type so an action id can never be looked up as a
//! state id.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Rejects empty or whitespace-only identifiers.
            pub fn validate(&self) -> Result<(), ValidationError> {
                if self.0.trim().is_empty() {
                    return Err(ValidationError::EmptyId {
                        field: $field.to_string(),
                    });
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a synthetic subject.
    PersonaId,
    "persona_id"
);
string_id!(
    /// Identifier of an insight record.
    InsightId,
    "insight_id"
);
string_id!(
    /// Identifier of a protocol.
    ProtocolId,
    "protocol_id"
);
string_id!(
    /// Identifier of an action within a protocol.
    ActionId,
    "action_id"
);
string_id!(
    /// Identifier of a physiological or contextual state within a protocol.
    StateId,
    "state_id"
);
