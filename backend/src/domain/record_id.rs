//! Opaque record identifiers assigned by the records store.
//!
//! Identifiers are carried verbatim; the only rules are that they are
//! non-empty and carry no surrounding whitespace.

use std::fmt;

/// Validation errors for record identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdValidationError {
    Empty,
    SurroundingWhitespace,
}

impl fmt::Display for RecordIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "identifier must not have leading or trailing whitespace")
            }
        }
    }
}

impl std::error::Error for RecordIdValidationError {}

pub(crate) fn check_record_id(raw: &str) -> Result<(), RecordIdValidationError> {
    if raw.is_empty() {
        return Err(RecordIdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(RecordIdValidationError::SurroundingWhitespace);
    }
    Ok(())
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a store-assigned identifier.
            pub fn new(
                id: impl Into<String>,
            ) -> Result<Self, $crate::domain::record_id::RecordIdValidationError> {
                let id = id.into();
                $crate::domain::record_id::check_record_id(&id)?;
                Ok(Self(id))
            }

            /// Mint a random identifier for stores that expect the client to
            /// supply one.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::record_id::RecordIdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::record_id::RecordIdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

pub(crate) use define_record_id;
