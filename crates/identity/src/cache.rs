// Path: crates/identity/src/cache.rs
//! Per-identity checkpoints ordered by height.

use idkeys_api::error::IdentityError;
use idkeys_types::app::{CacheSnapshot, Checkpoint, IdentityChainId};
use std::collections::BTreeMap;

/// Checkpoints and names for every identity resolved so far.
///
/// Checkpoints of one identity are kept in non-decreasing height order, at most
/// one per height. The first is always the genesis checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeightIndexedCache {
    keys: BTreeMap<IdentityChainId, Vec<Checkpoint>>,
    names: BTreeMap<IdentityChainId, Vec<Vec<u8>>>,
}

impl HeightIndexedCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cache from its serialized form.
    ///
    /// Fails with `InvalidCache` if an identity has no checkpoints, heights go
    /// backwards or repeat, or a name part is not hex.
    pub fn from_snapshot(snapshot: CacheSnapshot) -> Result<Self, IdentityError> {
        for (chain_id, checkpoints) in &snapshot.keys {
            if checkpoints.is_empty() {
                return Err(IdentityError::InvalidCache(format!(
                    "identity {} has no checkpoints",
                    chain_id
                )));
            }
            if checkpoints.windows(2).any(|w| match w {
                [a, b] => a.height >= b.height,
                _ => false,
            }) {
                return Err(IdentityError::InvalidCache(format!(
                    "checkpoints of identity {} are not in strictly increasing height order",
                    chain_id
                )));
            }
        }

        let mut names = BTreeMap::new();
        for (chain_id, parts) in snapshot.names {
            let decoded = parts
                .iter()
                .map(hex::decode)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    IdentityError::InvalidCache(format!("name of identity {}: {}", chain_id, e))
                })?;
            names.insert(chain_id, decoded);
        }

        Ok(Self {
            keys: snapshot.keys,
            names,
        })
    }

    /// The serialized form of the whole cache.
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            keys: self.keys.clone(),
            names: self
                .names
                .iter()
                .map(|(chain_id, parts)| (chain_id.clone(), parts.iter().map(hex::encode).collect()))
                .collect(),
        }
    }

    /// Stores `checkpoint` as the newest state of `chain_id`.
    ///
    /// A checkpoint at the same height as the newest one replaces it, which folds
    /// several rotations of one block into one observable state. A lower height
    /// fails with `CacheOrder`.
    pub fn append(
        &mut self,
        chain_id: &IdentityChainId,
        checkpoint: Checkpoint,
    ) -> Result<(), IdentityError> {
        let checkpoints = self.keys.entry(chain_id.clone()).or_default();
        match checkpoints.last_mut() {
            Some(last) if checkpoint.height < last.height => Err(IdentityError::CacheOrder {
                latest: last.height,
                got: checkpoint.height,
            }),
            Some(last) if checkpoint.height == last.height => {
                *last = checkpoint;
                Ok(())
            }
            _ => {
                checkpoints.push(checkpoint);
                Ok(())
            }
        }
    }

    /// Active keys of `chain_id` at `height`, or at the newest checkpoint when `height` is `None`.
    pub fn lookup(
        &self,
        chain_id: &IdentityChainId,
        height: Option<u64>,
    ) -> Result<&[String], IdentityError> {
        let checkpoints = self
            .keys
            .get(chain_id)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IdentityError::UnknownIdentity(chain_id.to_string()))?;
        let height = height.unwrap_or(u64::MAX);
        checkpoints
            .iter()
            .rev()
            .find(|cp| cp.height <= height)
            .map(|cp| cp.active_keys.as_slice())
            .ok_or_else(|| IdentityError::ChainNotYetExisting {
                chain_id: chain_id.to_string(),
                height,
            })
    }

    /// Every checkpoint of `chain_id`, oldest first.
    pub fn checkpoints(&self, chain_id: &IdentityChainId) -> &[Checkpoint] {
        self.keys.get(chain_id).map_or(&[], Vec::as_slice)
    }

    /// The newest checkpoint of `chain_id`.
    pub fn latest(&self, chain_id: &IdentityChainId) -> Option<&Checkpoint> {
        self.keys.get(chain_id).and_then(|c| c.last())
    }

    /// Height of the newest checkpoint of `chain_id`.
    pub fn latest_height(&self, chain_id: &IdentityChainId) -> Option<u64> {
        self.latest(chain_id).map(|cp| cp.height)
    }

    /// The cached name of `chain_id`.
    pub fn name(&self, chain_id: &IdentityChainId) -> Option<&[Vec<u8>]> {
        self.names.get(chain_id).map(Vec::as_slice)
    }

    /// Caches the name of `chain_id`.
    pub fn set_name(&mut self, chain_id: &IdentityChainId, name: Vec<Vec<u8>>) {
        self.names.insert(chain_id.clone(), name);
    }

    /// Identities with at least one checkpoint.
    pub fn identities(&self) -> impl Iterator<Item = &IdentityChainId> {
        self.keys
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(chain_id, _)| chain_id)
    }
}
