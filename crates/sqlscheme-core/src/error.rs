//! Error types for scheme declaration and record construction.

use std::fmt;

/// Result alias used throughout `sqlscheme-core`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring schemes or building records.
///
/// A missing tuple field is deliberately not represented here: reads fall
/// back to a value instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two attributes share a name within one scheme.
    DuplicateAttribute {
        /// Store name of the scheme being declared.
        scheme: String,
        /// The colliding attribute name.
        name: String,
    },
    /// Two attributes map onto the same tuple field.
    DuplicateField {
        /// Store name of the scheme being declared.
        scheme: String,
        /// The colliding storage field.
        field: String,
        /// Attribute that already owns the field.
        existing: String,
    },
    /// A store, attribute or field name is not a usable identifier.
    InvalidIdentifier(String),
    /// An accessor was requested for an attribute the scheme never declared.
    UnknownAttribute {
        /// Store name of the scheme.
        scheme: String,
        /// The requested attribute name.
        name: String,
    },
    /// A value was supplied at creation for an undeclared attribute while
    /// extra values are forbidden.
    ExtraValue {
        /// Store name of the scheme.
        scheme: String,
        /// The supplied key.
        name: String,
    },
    /// A computed default producer failed.
    DefaultProducer {
        /// Attribute whose default was being resolved.
        attribute: String,
        /// Producer failure message.
        message: String,
    },
    /// Configuration input could not be parsed.
    Config(String),
    /// A storage row could not be turned into a tuple.
    Row(String),
}

impl Error {
    /// Build a producer failure for use inside computed defaults.
    ///
    /// The attribute name is filled in when the failure passes through
    /// default resolution.
    pub fn producer(message: impl Into<String>) -> Self {
        Error::DefaultProducer {
            attribute: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateAttribute { scheme, name } => {
                write!(f, "duplicate attribute '{}' in scheme '{}'", name, scheme)
            }
            Error::DuplicateField {
                scheme,
                field,
                existing,
            } => write!(
                f,
                "field '{}' in scheme '{}' is already mapped by attribute '{}'",
                field, scheme, existing
            ),
            Error::InvalidIdentifier(ident) => write!(f, "invalid identifier '{}'", ident),
            Error::UnknownAttribute { scheme, name } => {
                write!(f, "scheme '{}' has no attribute '{}'", scheme, name)
            }
            Error::ExtraValue { scheme, name } => write!(
                f,
                "value supplied for undeclared attribute '{}' of scheme '{}'",
                name, scheme
            ),
            Error::DefaultProducer { attribute, message } if attribute.is_empty() => {
                write!(f, "default producer failed: {}", message)
            }
            Error::DefaultProducer { attribute, message } => write!(
                f,
                "default producer for attribute '{}' failed: {}",
                attribute, message
            ),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Row(msg) => write!(f, "invalid row: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_attribute_display() {
        let err = Error::DuplicateAttribute {
            scheme: "users".to_string(),
            name: "email".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate attribute 'email' in scheme 'users'"
        );
    }

    #[test]
    fn test_producer_display_with_and_without_attribute() {
        let bare = Error::producer("clock unavailable");
        assert_eq!(bare.to_string(), "default producer failed: clock unavailable");

        let named = Error::DefaultProducer {
            attribute: "created".to_string(),
            message: "clock unavailable".to_string(),
        };
        assert_eq!(
            named.to_string(),
            "default producer for attribute 'created' failed: clock unavailable"
        );
    }

    #[test]
    fn test_row_display() {
        let err = Error::Row("expected a JSON object".to_string());
        assert_eq!(err.to_string(), "invalid row: expected a JSON object");
    }
}
