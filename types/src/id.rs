//! Identifier newtypes.
//!
//! Subjects, tags and routes are keyed by store-assigned integers; actors are
//! whatever opaque reference the authentication layer hands us.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifier of an enrolled subject (herder).
    SubjectId
);
numeric_id!(
    /// Identifier of a livestock tag record.
    TagId
);
numeric_id!(
    /// Identifier of a grazing route.
    RouteId
);

/// Reference to the officer who performed a check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_serialize_as_plain_numbers() {
        let id = SubjectId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: SubjectId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn actor_id_is_transparent() {
        let actor = ActorId::new("officer-7");
        assert_eq!(serde_json::to_string(&actor).unwrap(), "\"officer-7\"");
        assert_eq!(actor.to_string(), "officer-7");
    }
}
