//! Identifier validation for store, attribute and field names.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

fn identifier_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| match Regex::new(IDENTIFIER_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!(error = %e, "identifier pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Check whether `ident` can name a store, attribute or field.
pub fn is_valid_identifier(ident: &str) -> bool {
    identifier_regex().is_some_and(|regex| regex.is_match(ident))
}

/// Validate an identifier, failing with [`Error::InvalidIdentifier`].
pub fn validate_identifier(ident: &str) -> Result<()> {
    if is_valid_identifier(ident) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(ident.to_string()))
    }
}
