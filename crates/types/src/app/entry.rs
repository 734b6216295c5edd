// Path: crates/types/src/app/entry.rs

//! The explicit shape of a chain entry as consumed by the identity state machine.
//!
//! Entries come from an external append-only log. Only the fields below are read,
//! which decouples the core from whatever client produced them. Byte fields are
//! hex-encoded when serialized so that entry logs can be stored as plain JSON.

use crate::markers::{IDENTITY_CHAIN_MARKER, REPLACE_KEY_MARKER};
use serde::{Deserialize, Serialize};

/// The 32-byte hash identifying an entry's content.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[serde(transparent)]
pub struct EntryHash(#[serde(with = "hex::serde")] pub [u8; 32]);

impl From<[u8; 32]> for EntryHash {
    fn from(hash: [u8; 32]) -> Self {
        Self(hash)
    }
}

impl AsRef<[u8]> for EntryHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Display for EntryHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// The block in which an entry was recorded.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockContext {
    /// Height of the directory block that anchors the entry.
    pub directory_block_height: u64,
    /// Entry timestamp in seconds, when the log provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_timestamp: Option<u64>,
}

/// An immutable entry read from an identity chain.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Ordered external ids.
    #[serde(with = "hex_list")]
    pub ext_ids: Vec<Vec<u8>>,
    /// Opaque content payload.
    #[serde(with = "hex::serde")]
    pub content: Vec<u8>,
    /// Stable content hash.
    pub hash: EntryHash,
    /// Block context of the entry.
    pub block_context: BlockContext,
}

impl Entry {
    /// Height of the directory block containing this entry.
    pub fn height(&self) -> u64 {
        self.block_context.directory_block_height
    }

    /// The first external id, if the entry carries any.
    pub fn marker(&self) -> Option<&[u8]> {
        self.ext_ids.first().map(Vec::as_slice)
    }

    /// True when the first external id is the genesis or the key replacement marker.
    ///
    /// Anything else on an identity chain is garbage and is dropped before replay.
    pub fn is_identity_entry(&self) -> bool {
        matches!(self.marker(), Some(m) if m == IDENTITY_CHAIN_MARKER || m == REPLACE_KEY_MARKER)
    }
}

mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
