//! Per-scheme configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// What to do with values supplied at creation for undeclared attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraValues {
    /// Drop them.
    #[default]
    Ignore,
    /// Fail record creation with [`Error::ExtraValue`](crate::Error::ExtraValue).
    Forbid,
    /// Store them in the tuple under the supplied key.
    Allow,
}

/// Configuration carried by a [`Scheme`](crate::scheme::Scheme).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemeConfig {
    /// Handling of supplied values that match no attribute.
    pub extra_values: ExtraValues,
}

impl SchemeConfig {
    /// Parse configuration from JSON, e.g. `{"extra_values": "forbid"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the extra-values policy.
    pub fn extra_values(mut self, policy: ExtraValues) -> Self {
        self.extra_values = policy;
        self
    }
}
