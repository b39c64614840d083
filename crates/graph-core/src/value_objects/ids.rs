//! Opaque identifiers issued by collaborators
//!
//! Actor ids come from the identity service, content ids from the content
//! service. Neither service promises a numeric format (document-store
//! object ids, UUIDs and decimal ids all occur), so both are bounded
//! ASCII tokens. They serialize as JSON strings and accept numbers on input.

use std::fmt;

/// Longest identifier accepted from a collaborator, in bytes
pub const MAX_ID_LEN: usize = 64;

/// Error when parsing an identifier from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier is longer than {MAX_ID_LEN} bytes")]
    TooLong,

    #[error("invalid identifier format")]
    InvalidFormat,
}

/// Identifier tokens are `[A-Za-z0-9_-]{1,64}`. `:` and `/` never occur, so
/// ids embed in cursors and paths without escaping.
fn check_id(s: &str) -> Result<(), IdParseError> {
    if s.is_empty() {
        return Err(IdParseError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdParseError::TooLong);
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(IdParseError::InvalidFormat);
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $expecting:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Parse from string representation, trimming surrounding whitespace
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                let s = s.trim();
                check_id(s)?;
                Ok(Self(s.to_owned()))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        /// Decimal ids issued by integer-keyed collaborators
        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use serde::de::{self, Visitor};

                struct IdVisitor;

                impl<'de> Visitor<'de> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str($expecting)
                    }

                    fn visit_i64<E>(self, value: i64) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        Ok($name::from(value))
                    }

                    fn visit_u64<E>(self, value: u64) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        Ok($name(value.to_string()))
                    }

                    fn visit_str<E>(self, value: &str) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        $name::parse(value).map_err(de::Error::custom)
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

opaque_id!(
    /// Identity of an account that can subscribe or react (always a user account id)
    ActorId,
    "a string or integer representing an actor id"
);

opaque_id!(
    /// Identity of a content item (video, comment or tweet)
    ContentId,
    "a string or integer representing a content id"
);
