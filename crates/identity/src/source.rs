// Path: crates/identity/src/source.rs
//! An in-memory entry log, loadable from a JSON file.

use async_trait::async_trait;
use idkeys_api::error::IdentityError;
use idkeys_api::source::{EntryQuery, EntrySource};
use idkeys_types::app::{Entry, IdentityChainId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// The on-disk shape of an entry log: every chain's entries, oldest first.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryLog {
    /// Entries per chain in append order.
    pub chains: BTreeMap<IdentityChainId, Vec<Entry>>,
}

impl EntryLog {
    /// Reads a JSON entry log.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| IdentityError::Source(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| IdentityError::Source(format!("{}: {}", path.display(), e)))
    }
}

/// An append-only entry log held in memory.
///
/// Entries are stored in append order and served newest first. Fetches are
/// counted so callers can observe how often the log was read.
#[derive(Debug, Default)]
pub struct MemoryEntrySource {
    chains: RwLock<BTreeMap<IdentityChainId, Vec<Entry>>>,
    fetches: AtomicUsize,
}

impl MemoryEntrySource {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log pre-filled from an [`EntryLog`].
    pub fn from_log(log: EntryLog) -> Self {
        Self {
            chains: RwLock::new(log.chains),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Appends `entry` to `chain_id`.
    pub fn push(&self, chain_id: &IdentityChainId, entry: Entry) -> Result<(), IdentityError> {
        self.chains
            .write()
            .map_err(|e| IdentityError::Source(e.to_string()))?
            .entry(chain_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Appends several entries to `chain_id`, in order.
    pub fn extend(
        &self,
        chain_id: &IdentityChainId,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Result<(), IdentityError> {
        self.chains
            .write()
            .map_err(|e| IdentityError::Source(e.to_string()))?
            .entry(chain_id.clone())
            .or_default()
            .extend(entries);
        Ok(())
    }

    /// Number of `fetch_entries` and `first_entry` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntrySource for MemoryEntrySource {
    async fn fetch_entries(
        &self,
        chain_id: &IdentityChainId,
        query: EntryQuery,
    ) -> Result<Vec<Entry>, IdentityError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let chains = self
            .chains
            .read()
            .map_err(|e| IdentityError::Source(e.to_string()))?;
        Ok(chains
            .get(chain_id)
            .map(|entries| {
                entries
                    .iter()
                    .rev()
                    .filter(|e| query.admits(e.height()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn first_entry(
        &self,
        chain_id: &IdentityChainId,
    ) -> Result<Option<Entry>, IdentityError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let chains = self
            .chains
            .read()
            .map_err(|e| IdentityError::Source(e.to_string()))?;
        Ok(chains.get(chain_id).and_then(|e| e.first()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idkeys_test_utils::fixtures::{fixed_chain_id, garbage_entry};
    use std::io::Write;

    #[tokio::test]
    async fn test_serves_newest_first_within_bounds() {
        let chain = fixed_chain_id(1);
        let source = MemoryEntrySource::new();
        source
            .extend(&chain, [1, 3, 3, 7].map(garbage_entry))
            .unwrap();

        let all = source.fetch_entries(&chain, EntryQuery::full()).await.unwrap();
        let heights: Vec<u64> = all.iter().map(Entry::height).collect();
        assert_eq!(heights, vec![7, 3, 3, 1]);

        let since = source.fetch_entries(&chain, EntryQuery::since(3)).await.unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].height(), 7);

        let first = source.first_entry(&chain).await.unwrap().unwrap();
        assert_eq!(first.height(), 1);
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_empty() {
        let source = MemoryEntrySource::new();
        let chain = fixed_chain_id(9);
        assert!(source.fetch_entries(&chain, EntryQuery::full()).await.unwrap().is_empty());
        assert!(source.first_entry(&chain).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_loads_entry_log_file() {
        let chain = fixed_chain_id(2);
        let mut log = EntryLog::default();
        log.chains.insert(chain.clone(), vec![garbage_entry(4), garbage_entry(6)]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&log).unwrap()).unwrap();

        let loaded = EntryLog::load(file.path()).unwrap();
        assert_eq!(loaded, log);

        let source = MemoryEntrySource::from_log(loaded);
        let entries = source.fetch_entries(&chain, EntryQuery::full()).await.unwrap();
        assert_eq!(entries[0].height(), 6);

        assert!(matches!(
            EntryLog::load("/no/such/entries.json"),
            Err(IdentityError::Source(_))
        ));
    }
}
