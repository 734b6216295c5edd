// Path: crates/types/src/app/chain.rs

//! Defines the canonical `IdentityChainId`.
//!
//! The chain id is kept in its textual form because the rotation signature
//! covers the id's string representation byte-for-byte.

use serde::{Deserialize, Serialize};

/// The identifier of an identity chain on the external entry log.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[serde(transparent)] // Ensures JSON map keys are just the raw string
pub struct IdentityChainId(String);

impl IdentityChainId {
    /// Wraps a chain id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the chain id as it is covered by rotation signatures.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IdentityChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdentityChainId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for IdentityChainId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl core::fmt::Display for IdentityChainId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
