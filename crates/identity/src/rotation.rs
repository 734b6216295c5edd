// Path: crates/identity/src/rotation.rs
//! The key rotation rule engine.
//!
//! A rotation entry carries `[ReplaceKey, old_key, new_key, signature, signer]`.
//! It is applied only if five gates pass, in order:
//!
//! 1. `old_key` is currently active (at index `i`).
//! 2. `new_key` has never been active.
//! 3. `signer` is currently active at index `j` and the configured
//!    [`SignerPriority`] permits `j` to replace `i`.
//! 4. `new_key` is a valid public identity key.
//! 5. `signature` is 64 bytes and verifies over `chain_id || old_key || new_key`
//!    against the signer's key material.
//!
//! A failing gate drops the candidate silently and replay moves on to the next
//! entry. Replay never aborts on a bad rotation.

use idkeys_crypto::keys::{extract_crypto_material, is_valid_public_identity_key};
use idkeys_crypto::sign::preimage::verify_detached;
use idkeys_types::app::{Checkpoint, Entry, IdentityChainId};
use idkeys_types::config::{IdentityConfig, SignerPriority};
use idkeys_types::markers::{REPLACE_KEY_EXT_ID_COUNT, REPLACE_KEY_MARKER, SIGNATURE_LEN};
use std::collections::BTreeSet;

/// The working key state an identity's history is replayed against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyState {
    /// Active keys, highest priority first.
    pub active_keys: Vec<String>,
    /// Every key that has ever been active.
    pub all_keys: BTreeSet<String>,
}

impl KeyState {
    /// The state declared by a genesis entry.
    pub fn genesis(keys: Vec<String>) -> Self {
        let all_keys = keys.iter().cloned().collect();
        Self {
            active_keys: keys,
            all_keys,
        }
    }

    /// A working copy of a stored checkpoint.
    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        Self {
            active_keys: checkpoint.active_keys.clone(),
            all_keys: checkpoint.all_keys.clone(),
        }
    }

    /// Snapshots this state as a checkpoint at `height`.
    pub fn to_checkpoint(&self, height: u64) -> Checkpoint {
        Checkpoint {
            height,
            active_keys: self.active_keys.clone(),
            all_keys: self.all_keys.clone(),
        }
    }

    /// Priority rank of `key`: its index among the active keys.
    pub fn rank(&self, key: &str) -> Option<usize> {
        self.active_keys.iter().position(|k| k == key)
    }

    /// Applies an outcome. Rejections leave the state untouched.
    ///
    /// Returns true if a slot changed.
    pub fn apply(&mut self, outcome: &RotationOutcome) -> bool {
        let RotationOutcome::Accepted { slot, new_key } = outcome else {
            return false;
        };
        let Some(active) = self.active_keys.get_mut(*slot) else {
            return false;
        };
        *active = new_key.clone();
        self.all_keys.insert(new_key.clone());
        true
    }
}

/// A well-shaped key replacement request read from an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationCandidate {
    /// Key to replace.
    pub old_key: String,
    /// Key taking its slot.
    pub new_key: String,
    /// Raw detached signature bytes.
    pub signature: Vec<u8>,
    /// Active key that signed the replacement.
    pub signer_key: String,
}

impl RotationCandidate {
    /// Reads a candidate from `entry`.
    ///
    /// Only entries with exactly five external ids and the `ReplaceKey` marker are
    /// candidates. Text fields are decoded lossily, so non-UTF-8 bytes simply fail
    /// the later gates.
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        if entry.ext_ids.len() != REPLACE_KEY_EXT_ID_COUNT {
            return None;
        }
        let [marker, old_key, new_key, signature, signer_key] = entry.ext_ids.as_slice() else {
            return None;
        };
        if marker.as_slice() != REPLACE_KEY_MARKER {
            return None;
        }
        Some(Self {
            old_key: String::from_utf8_lossy(old_key).into_owned(),
            new_key: String::from_utf8_lossy(new_key).into_owned(),
            signature: signature.clone(),
            signer_key: String::from_utf8_lossy(signer_key).into_owned(),
        })
    }

    /// The bytes covered by the signature.
    pub fn signed_message(&self, chain_id: &IdentityChainId) -> Vec<u8> {
        [
            chain_id.as_str().as_bytes(),
            self.old_key.as_bytes(),
            self.new_key.as_bytes(),
        ]
        .concat()
    }
}

/// Why a candidate was dropped. Variants follow gate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Gate 1.
    OldKeyNotActive,
    /// Gate 2.
    NewKeyPreviouslyUsed,
    /// Gate 3, the signer is not an active key.
    SignerNotActive,
    /// Gate 3, the signer ranks below what the priority rule allows.
    SignerPriorityTooLow,
    /// Gate 4.
    InvalidNewKey,
    /// Gate 5.
    InvalidSignature,
}

impl RejectReason {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OldKeyNotActive => "old_key_not_active",
            Self::NewKeyPreviouslyUsed => "new_key_previously_used",
            Self::SignerNotActive => "signer_not_active",
            Self::SignerPriorityTooLow => "signer_priority_too_low",
            Self::InvalidNewKey => "invalid_new_key",
            Self::InvalidSignature => "invalid_signature",
        }
    }
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of evaluating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Every gate passed: `slot` now holds `new_key`.
    Accepted {
        /// Index of the replaced key.
        slot: usize,
        /// The key placed in that slot.
        new_key: String,
    },
    /// A gate failed.
    Rejected(RejectReason),
}

impl RotationOutcome {
    /// True for [`RotationOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Evaluates rotation candidates against a [`KeyState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationEngine {
    priority: SignerPriority,
}

impl RotationEngine {
    /// An engine applying `priority` at the signer gate.
    pub fn new(priority: SignerPriority) -> Self {
        Self { priority }
    }

    /// An engine configured from an [`IdentityConfig`].
    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(config.signer_priority)
    }

    /// The signer priority rule in force.
    pub fn priority(&self) -> SignerPriority {
        self.priority
    }

    /// Runs the five gates without touching `state`.
    pub fn evaluate(
        &self,
        chain_id: &IdentityChainId,
        state: &KeyState,
        candidate: &RotationCandidate,
    ) -> RotationOutcome {
        let Some(slot) = state.rank(&candidate.old_key) else {
            return RotationOutcome::Rejected(RejectReason::OldKeyNotActive);
        };
        if state.all_keys.contains(&candidate.new_key) {
            return RotationOutcome::Rejected(RejectReason::NewKeyPreviouslyUsed);
        }
        let Some(signer_rank) = state.rank(&candidate.signer_key) else {
            return RotationOutcome::Rejected(RejectReason::SignerNotActive);
        };
        if !self.priority.permits(signer_rank, slot) {
            return RotationOutcome::Rejected(RejectReason::SignerPriorityTooLow);
        }
        if !is_valid_public_identity_key(&candidate.new_key) {
            return RotationOutcome::Rejected(RejectReason::InvalidNewKey);
        }
        if !self.signature_is_valid(chain_id, candidate) {
            return RotationOutcome::Rejected(RejectReason::InvalidSignature);
        }
        RotationOutcome::Accepted {
            slot,
            new_key: candidate.new_key.clone(),
        }
    }

    fn signature_is_valid(&self, chain_id: &IdentityChainId, candidate: &RotationCandidate) -> bool {
        if candidate.signature.len() != SIGNATURE_LEN {
            return false;
        }
        let Ok(signer) = extract_crypto_material(&candidate.signer_key) else {
            return false;
        };
        verify_detached(
            &signer,
            &candidate.signed_message(chain_id),
            &candidate.signature,
        )
    }

    /// Evaluates `candidate` and applies the outcome to `state`.
    pub fn apply(
        &self,
        chain_id: &IdentityChainId,
        state: &mut KeyState,
        candidate: &RotationCandidate,
    ) -> RotationOutcome {
        let outcome = self.evaluate(chain_id, state, candidate);
        state.apply(&outcome);
        outcome
    }
}
