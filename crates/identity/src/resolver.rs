// Path: crates/identity/src/resolver.rs
//! Answers "which keys were active for identity X at height H".
//!
//! The resolver owns a [`HeightIndexedCache`]. A cold identity is loaded by
//! fetching its whole chain, parsing the genesis entry and replaying every
//! rotation. Later queries at or below the cached frontier are answered from
//! the cache; queries above it fetch and replay only the entries past the
//! frontier.
//!
//! Every method takes `&mut self`, so one resolver serves one query at a time.
//! To share a resolver between tasks, wrap it in a `tokio::sync::Mutex`.

use crate::cache::HeightIndexedCache;
use crate::genesis::parse_genesis;
use crate::rotation::{KeyState, RotationCandidate, RotationEngine, RotationOutcome};
use idkeys_api::error::{ErrorCode, IdentityError};
use idkeys_api::persist::{CacheSink, NoopSink};
use idkeys_api::source::{EntryQuery, EntrySource};
use idkeys_crypto::keys::public_identity_key;
use idkeys_telemetry::{error_metrics, identity_metrics, time::Timer};
use idkeys_types::app::{CacheSnapshot, Checkpoint, Entry, IdentityChainId};
use idkeys_types::config::IdentityConfig;

/// Resolves identity key histories from an [`EntrySource`].
pub struct IdentityResolver<S: EntrySource> {
    source: S,
    sink: Box<dyn CacheSink>,
    cache: HeightIndexedCache,
    engine: RotationEngine,
    config: IdentityConfig,
}

impl<S: EntrySource> IdentityResolver<S> {
    /// A resolver with an empty cache that persists nowhere.
    pub fn new(source: S, config: IdentityConfig) -> Self {
        Self {
            source,
            sink: Box::new(NoopSink),
            cache: HeightIndexedCache::new(),
            engine: RotationEngine::from_config(&config),
            config,
        }
    }

    /// Replaces the persistence callback.
    pub fn with_sink(mut self, sink: impl CacheSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Bootstraps the cache from a previously saved snapshot.
    pub fn with_snapshot(mut self, snapshot: CacheSnapshot) -> Result<Self, IdentityError> {
        self.cache = HeightIndexedCache::from_snapshot(snapshot)?;
        Ok(self)
    }

    /// The cache as it stands.
    pub fn cache(&self) -> &HeightIndexedCache {
        &self.cache
    }

    /// The configuration in force.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// The underlying entry source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the resolver, returning the serialized cache.
    pub fn into_snapshot(self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    /// Active keys of `chain_id` at `height`, highest priority first.
    ///
    /// `None` means the latest height. Fails with `UnknownIdentity` when the chain
    /// has no identity entries, `InvalidGenesis` when its first entry is not a
    /// valid declaration, and `ChainNotYetExisting` when `height` precedes it.
    pub async fn active_keys_at_height(
        &mut self,
        chain_id: &IdentityChainId,
        height: Option<u64>,
    ) -> Result<Vec<String>, IdentityError> {
        let result = self.resolve(chain_id, height).await;
        if let Err(e) = &result {
            error_metrics().inc_error("identity", e.code());
        }
        result
    }

    async fn resolve(
        &mut self,
        chain_id: &IdentityChainId,
        height: Option<u64>,
    ) -> Result<Vec<String>, IdentityError> {
        let mutated = match self.cache.latest_height(chain_id) {
            None => {
                self.load_cold(chain_id).await?;
                true
            }
            Some(frontier) if height.map_or(true, |h| h > frontier) => {
                self.extend(chain_id, frontier).await?
            }
            Some(_) => {
                identity_metrics().inc_cache_hits();
                false
            }
        };
        if mutated {
            self.persist().await?;
        }
        self.cache.lookup(chain_id, height).map(<[String]>::to_vec)
    }

    async fn load_cold(&mut self, chain_id: &IdentityChainId) -> Result<(), IdentityError> {
        let entries = self.fetch(chain_id, EntryQuery::full(), "full").await?;
        let mut entries = entries.into_iter();
        let genesis_entry = entries
            .next()
            .ok_or_else(|| IdentityError::UnknownIdentity(chain_id.to_string()))?;
        let genesis = parse_genesis(&genesis_entry)?;

        tracing::info!(
            target: "identity",
            chain_id = %chain_id,
            height = genesis_entry.height(),
            keys = genesis.keys.len(),
            "loaded identity genesis"
        );

        if self.cache.name(chain_id).is_none() {
            self.cache.set_name(chain_id, genesis.name);
        }
        let state = KeyState::genesis(genesis.keys);
        self.cache
            .append(chain_id, state.to_checkpoint(genesis_entry.height()))?;

        let remaining: Vec<Entry> = entries.collect();
        for checkpoint in self.replay(chain_id, state, &remaining) {
            self.cache.append(chain_id, checkpoint)?;
        }
        Ok(())
    }

    /// Replays entries above `frontier`. Returns true if a checkpoint was added.
    async fn extend(
        &mut self,
        chain_id: &IdentityChainId,
        frontier: u64,
    ) -> Result<bool, IdentityError> {
        let entries = self
            .fetch(chain_id, EntryQuery::since(frontier), "incremental")
            .await?;
        let Some(latest) = self.cache.latest(chain_id) else {
            return Err(IdentityError::UnknownIdentity(chain_id.to_string()));
        };
        let checkpoints = self.replay(chain_id, KeyState::from_checkpoint(latest), &entries);
        let mutated = !checkpoints.is_empty();
        for checkpoint in checkpoints {
            self.cache.append(chain_id, checkpoint)?;
        }
        tracing::debug!(
            target: "identity",
            chain_id = %chain_id,
            frontier,
            fetched = entries.len(),
            mutated,
            "extended identity history"
        );
        Ok(mutated)
    }

    /// Fetches identity entries in `query`, ascending by height.
    async fn fetch(
        &self,
        chain_id: &IdentityChainId,
        query: EntryQuery,
        kind: &'static str,
    ) -> Result<Vec<Entry>, IdentityError> {
        let mut entries = self.source.fetch_entries(chain_id, query).await?;
        identity_metrics().inc_entries_fetched(kind, entries.len() as u64);
        entries.reverse();
        // Stable, so entries of one height keep their log order.
        entries.sort_by_key(Entry::height);
        entries.retain(|e| e.is_identity_entry() && query.admits(e.height()));
        Ok(entries)
    }

    /// Replays `entries` (ascending) on top of `state`.
    ///
    /// Yields one checkpoint per height at which at least one rotation was
    /// accepted, holding the state after the last rotation of that height.
    fn replay(
        &self,
        chain_id: &IdentityChainId,
        mut state: KeyState,
        entries: &[Entry],
    ) -> Vec<Checkpoint> {
        let metrics = identity_metrics();
        let _timer = Timer::new(metrics);
        let mut checkpoints = Vec::new();
        let mut pending: Option<u64> = None;

        for entry in entries {
            let height = entry.height();
            if let Some(h) = pending.filter(|h| *h != height) {
                checkpoints.push(state.to_checkpoint(h));
                pending = None;
            }
            let Some(candidate) = RotationCandidate::from_entry(entry) else {
                continue;
            };
            match self.engine.apply(chain_id, &mut state, &candidate) {
                RotationOutcome::Accepted { slot, .. } => {
                    metrics.inc_rotations_accepted();
                    tracing::info!(
                        target: "identity",
                        chain_id = %chain_id,
                        height,
                        slot,
                        entry = %entry.hash,
                        "key rotation accepted"
                    );
                    pending = Some(height);
                }
                RotationOutcome::Rejected(reason) => {
                    metrics.inc_rotations_rejected(reason.as_str());
                    tracing::debug!(
                        target: "identity",
                        chain_id = %chain_id,
                        height,
                        entry = %entry.hash,
                        %reason,
                        "key rotation rejected"
                    );
                }
            }
        }
        if let Some(h) = pending {
            checkpoints.push(state.to_checkpoint(h));
        }
        checkpoints
    }

    /// The name declared by the identity's genesis entry.
    ///
    /// Served from the cache when known. Otherwise the first entry of the chain is
    /// fetched and validated, and its name is cached.
    pub async fn identity_name(
        &mut self,
        chain_id: &IdentityChainId,
    ) -> Result<Vec<Vec<u8>>, IdentityError> {
        if let Some(name) = self.cache.name(chain_id) {
            return Ok(name.to_vec());
        }
        let first = self
            .source
            .first_entry(chain_id)
            .await?
            .ok_or_else(|| IdentityError::UnknownIdentity(chain_id.to_string()))?;
        identity_metrics().inc_entries_fetched("first", 1);
        let genesis = parse_genesis(&first)?;
        self.cache.set_name(chain_id, genesis.name.clone());
        self.persist().await?;
        Ok(genesis.name)
    }

    /// True if `key` (public or secret form) was active for `chain_id` at `height`.
    ///
    /// Fails with `InvalidKey` if `key` is not a valid identity key.
    pub async fn is_identity_key_active(
        &mut self,
        chain_id: &IdentityChainId,
        key: &str,
        height: Option<u64>,
    ) -> Result<bool, IdentityError> {
        let public = public_identity_key(key).map_err(|_| {
            IdentityError::InvalidKey(format!("{} is not an identity key", redact(key)))
        })?;
        let active = self.active_keys_at_height(chain_id, height).await?;
        Ok(active.contains(&public))
    }

    async fn persist(&self) -> Result<(), IdentityError> {
        if !self.config.persist_on_change {
            return Ok(());
        }
        self.sink.save(&self.cache.snapshot()).await
    }
}

/// Keeps secret keys out of error messages.
fn redact(key: &str) -> &str {
    if key.starts_with("idsec") {
        "<secret key>"
    } else {
        key
    }
}
