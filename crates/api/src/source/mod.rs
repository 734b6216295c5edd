// Path: crates/api/src/source/mod.rs

//! Defines the `EntrySource` trait through which the identity resolver reads an
//! identity chain from the external, append-only entry log.

use crate::error::IdentityError;
use async_trait::async_trait;
use idkeys_types::app::{Entry, IdentityChainId};
use std::sync::Arc;

/// Bounds on the directory block heights a fetch should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryQuery {
    /// Only entries strictly above this height are wanted.
    pub since_exclusive: Option<u64>,
    /// Only entries at or below this height are wanted.
    pub until_inclusive: Option<u64>,
}

impl EntryQuery {
    /// The whole history of a chain.
    pub fn full() -> Self {
        Self::default()
    }

    /// Every entry strictly above `height`.
    pub fn since(height: u64) -> Self {
        Self {
            since_exclusive: Some(height),
            until_inclusive: None,
        }
    }

    /// Returns true if an entry at `height` falls inside the query bounds.
    ///
    /// Sources may use this as the predicate that stops a newest-first traversal
    /// early. Callers filter results with it again regardless.
    pub fn admits(&self, height: u64) -> bool {
        self.since_exclusive.map_or(true, |s| height > s)
            && self.until_inclusive.map_or(true, |u| height <= u)
    }
}

/// A read-only view of the entry log backing identity chains.
///
/// Implementations wrap a blockchain client. Transport, retries and timeouts are
/// the implementation's concern.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetches the entries of `chain_id` that fall inside `query`.
    ///
    /// Entries are returned newest first, the order in which a chain is rewound.
    async fn fetch_entries(
        &self,
        chain_id: &IdentityChainId,
        query: EntryQuery,
    ) -> Result<Vec<Entry>, IdentityError>;

    /// Fetches the very first entry of `chain_id`, or `None` if the chain is empty.
    async fn first_entry(&self, chain_id: &IdentityChainId)
        -> Result<Option<Entry>, IdentityError>;
}

#[async_trait]
impl<T: EntrySource + ?Sized> EntrySource for Arc<T> {
    async fn fetch_entries(
        &self,
        chain_id: &IdentityChainId,
        query: EntryQuery,
    ) -> Result<Vec<Entry>, IdentityError> {
        (**self).fetch_entries(chain_id, query).await
    }

    async fn first_entry(
        &self,
        chain_id: &IdentityChainId,
    ) -> Result<Option<Entry>, IdentityError> {
        (**self).first_entry(chain_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_bounds() {
        assert!(EntryQuery::full().admits(0));
        assert!(EntryQuery::full().admits(u64::MAX));

        let q = EntryQuery::since(5);
        assert!(!q.admits(5));
        assert!(q.admits(6));

        let bounded = EntryQuery {
            since_exclusive: Some(2),
            until_inclusive: Some(4),
        };
        assert!(!bounded.admits(2));
        assert!(bounded.admits(3));
        assert!(bounded.admits(4));
        assert!(!bounded.admits(5));
    }
}
