// Path: crates/types/src/app/checkpoint.rs

//! Height-indexed snapshots of an identity's key state, and the serialized
//! form of a whole cache.

use super::IdentityChainId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The active and historical keys of an identity as of a specific height.
///
/// A checkpoint exclusively owns its collections; storing one always stores a
/// copy so that later edits of a working set cannot rewrite history.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Directory block height this state became effective at.
    pub height: u64,
    /// Active public identity keys, highest priority first.
    pub active_keys: Vec<String>,
    /// Every public identity key that has ever been active, including current ones.
    pub all_keys: BTreeSet<String>,
}

impl Checkpoint {
    /// Builds the genesis checkpoint: all keys are exactly the initial active keys.
    pub fn genesis(height: u64, keys: Vec<String>) -> Self {
        let all_keys = keys.iter().cloned().collect();
        Self {
            height,
            active_keys: keys,
            all_keys,
        }
    }
}

/// The persisted form of a height-indexed cache.
///
/// Serializes as `{"keys": {chainId: [checkpoint...]}, "names": {chainId: [hex...]}}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct CacheSnapshot {
    /// Ordered checkpoints per identity chain.
    pub keys: BTreeMap<IdentityChainId, Vec<Checkpoint>>,
    /// Hex-encoded identity names (the genesis entry's remaining external ids).
    pub names: BTreeMap<IdentityChainId, Vec<String>>,
}
