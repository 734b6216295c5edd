// Path: crates/identity/src/management.rs
//! Builds the entries that create an identity and rotate its keys.
//!
//! Submitting entries to the chain is left to the caller: these helpers only
//! validate inputs, sign, and lay out the external ids.

use crate::resolver::IdentityResolver;
use idkeys_api::error::IdentityError;
use idkeys_api::source::EntrySource;
use idkeys_crypto::algorithms::hash::sha256;
use idkeys_crypto::keys::{
    extract_crypto_material, generate_random_identity_key_pair, is_valid_identity_key,
    is_valid_public_identity_key, is_valid_secret_identity_key, public_identity_key,
};
use idkeys_crypto::sign::preimage::sign;
use idkeys_types::app::{BlockContext, Entry, EntryHash, IdentityChainId};
use idkeys_types::markers::{GENESIS_CONTENT_VERSION, IDENTITY_CHAIN_MARKER, REPLACE_KEY_MARKER};
use std::collections::BTreeSet;
use zeroize::Zeroizing;

/// An entry ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Target chain. For a chain's first entry this is the id the chain will get.
    pub chain_id: Option<IdentityChainId>,
    /// External ids, in order.
    pub ext_ids: Vec<Vec<u8>>,
    /// Content payload.
    pub content: Vec<u8>,
}

impl NewEntry {
    /// The entry as it reads back once recorded at `height` under `hash`.
    pub fn into_entry(self, height: u64, hash: EntryHash) -> Entry {
        Entry {
            ext_ids: self.ext_ids,
            content: self.content,
            hash,
            block_context: BlockContext {
                directory_block_height: height,
                entry_timestamp: None,
            },
        }
    }
}

/// The id of a chain whose first entry carries `ext_ids`:
/// `sha256(sha256(ext_id_0) || sha256(ext_id_1) || ...)`, hex-encoded.
pub fn chain_id_for(ext_ids: &[Vec<u8>]) -> IdentityChainId {
    let hashes: Vec<u8> = ext_ids.iter().flat_map(sha256).collect();
    IdentityChainId::new(hex::encode(sha256(hashes)))
}

/// Builds the genesis entry of a new identity.
///
/// Every key must be a distinct public identity key; at least one is required.
pub fn build_identity_chain_entry(
    name: &[Vec<u8>],
    public_keys: &[String],
) -> Result<NewEntry, IdentityError> {
    if public_keys.is_empty() {
        return Err(IdentityError::InvalidKey(
            "an identity needs at least one key".into(),
        ));
    }
    let mut seen = BTreeSet::new();
    for key in public_keys {
        if !is_valid_public_identity_key(key) {
            return Err(IdentityError::InvalidKey(format!(
                "{} is not a valid public identity key",
                key
            )));
        }
        if !seen.insert(key.as_str()) {
            return Err(IdentityError::InvalidKey(format!("duplicate key {}", key)));
        }
    }

    let mut ext_ids = Vec::with_capacity(name.len() + 1);
    ext_ids.push(IDENTITY_CHAIN_MARKER.to_vec());
    ext_ids.extend(name.iter().cloned());
    let content = serde_json::json!({
        "version": GENESIS_CONTENT_VERSION,
        "keys": public_keys,
    })
    .to_string()
    .into_bytes();

    Ok(NewEntry {
        chain_id: Some(chain_id_for(&ext_ids)),
        ext_ids,
        content,
    })
}

/// Builds a signed entry replacing `old_key` with `new_key`.
///
/// `old_key` and `new_key` may be given in public or secret form; only their
/// public forms are recorded. `signing_secret` must be a secret identity key.
pub fn build_key_replacement_entry(
    chain_id: &IdentityChainId,
    old_key: &str,
    new_key: &str,
    signing_secret: &str,
) -> Result<NewEntry, IdentityError> {
    if !is_valid_secret_identity_key(signing_secret) {
        return Err(IdentityError::InvalidKey(
            "signing key must be a valid secret identity key".into(),
        ));
    }
    let old_public = to_public(old_key)?;
    let new_public = to_public(new_key)?;
    let signer_public = public_identity_key(signing_secret)?;

    let seed = Zeroizing::new(extract_crypto_material(signing_secret)?);
    let message = [chain_id.as_str(), old_public.as_str(), new_public.as_str()].concat();
    let signed = sign(&seed, message.as_bytes())?;

    Ok(NewEntry {
        chain_id: Some(chain_id.clone()),
        ext_ids: vec![
            REPLACE_KEY_MARKER.to_vec(),
            old_public.into_bytes(),
            new_public.into_bytes(),
            signed.signature.to_vec(),
            signer_public.into_bytes(),
        ],
        content: Vec::new(),
    })
}

fn to_public(key: &str) -> Result<String, IdentityError> {
    public_identity_key(key)
        .map_err(|_| IdentityError::InvalidKey(format!("{} is not a valid identity key", key)))
}

/// Which keys a new identity starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Generate this many fresh key pairs.
    Generate(usize),
    /// Use these keys, given in public or secret form.
    Existing(Vec<String>),
}

/// One key of a new identity.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Public identity key.
    pub public: String,
    /// Secret identity key, present only for generated keys.
    pub secret: Option<String>,
}

impl core::fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("public", &self.public)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Expands a [`KeySpec`] into concrete keys, in priority order.
pub fn resolve_identity_keys(spec: KeySpec) -> Result<Vec<ResolvedKey>, IdentityError> {
    match spec {
        KeySpec::Generate(count) => (0..count)
            .map(|_| {
                let pair = generate_random_identity_key_pair()?;
                Ok(ResolvedKey {
                    public: pair.public,
                    secret: Some(pair.secret),
                })
            })
            .collect(),
        KeySpec::Existing(keys) => keys
            .iter()
            .map(|key| {
                if !is_valid_identity_key(key) {
                    return Err(IdentityError::InvalidKey(format!(
                        "{} is not a valid identity key",
                        key
                    )));
                }
                Ok(ResolvedKey {
                    public: public_identity_key(key)?,
                    secret: None,
                })
            })
            .collect(),
    }
}

/// A new identity: its genesis entry and the keys it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedIdentity {
    /// The genesis entry to submit.
    pub entry: NewEntry,
    /// The declared keys, highest priority first.
    pub keys: Vec<ResolvedKey>,
}

/// Resolves `spec` and builds the genesis entry for an identity named `name`.
pub fn prepare_identity(name: &[Vec<u8>], spec: KeySpec) -> Result<PreparedIdentity, IdentityError> {
    let keys = resolve_identity_keys(spec)?;
    let publics: Vec<String> = keys.iter().map(|k| k.public.clone()).collect();
    let entry = build_identity_chain_entry(name, &publics)?;
    Ok(PreparedIdentity { entry, keys })
}

/// The keys involved in replacing one active key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyReplacementRequest {
    /// The key to retire, public or secret form.
    pub old_key: String,
    /// The key taking its place, public or secret form.
    pub new_key: String,
    /// Secret form of the active key authorizing the replacement.
    pub signing_secret: String,
}

impl core::fmt::Debug for KeyReplacementRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyReplacementRequest")
            .field("old_key", &self.old_key)
            .field("new_key", &self.new_key)
            .field("signing_secret", &"<redacted>")
            .finish()
    }
}

/// Checks a replacement against the identity's latest keys, then builds it.
///
/// Fails with `InvalidKey` for malformed keys or a new key that was already
/// used, and with `Unauthorized` when the old key or the signer is not active or
/// the signer's priority is insufficient under the resolver's configuration.
pub async fn prepare_key_replacement<S: EntrySource>(
    resolver: &mut IdentityResolver<S>,
    chain_id: &IdentityChainId,
    request: &KeyReplacementRequest,
) -> Result<NewEntry, IdentityError> {
    if !is_valid_secret_identity_key(&request.signing_secret) {
        return Err(IdentityError::InvalidKey(
            "signing key must be a valid secret identity key".into(),
        ));
    }
    let old_public = to_public(&request.old_key)?;
    let new_public = to_public(&request.new_key)?;
    let signer_public = public_identity_key(&request.signing_secret)?;

    let active = resolver.active_keys_at_height(chain_id, None).await?;
    let rank = |key: &str| active.iter().position(|k| k == key);
    let old_rank = rank(&old_public).ok_or_else(|| {
        IdentityError::Unauthorized(format!(
            "old key {} is not part of the active keys [{}]",
            old_public,
            active.join(", ")
        ))
    })?;
    let signer_rank = rank(&signer_public).ok_or_else(|| {
        IdentityError::Unauthorized(format!(
            "signing key {} is not part of the active keys [{}]",
            signer_public,
            active.join(", ")
        ))
    })?;
    if !resolver.config().signer_priority.permits(signer_rank, old_rank) {
        return Err(IdentityError::Unauthorized(format!(
            "priority of the signing key {} is not sufficient to replace the key {}",
            signer_public, old_public
        )));
    }
    let previously_used = resolver
        .cache()
        .latest(chain_id)
        .is_some_and(|cp| cp.all_keys.contains(&new_public));
    if previously_used {
        return Err(IdentityError::InvalidKey(format!(
            "{} has already been used by this identity",
            new_public
        )));
    }

    tracing::debug!(
        target: "identity::management",
        chain_id = %chain_id,
        slot = old_rank,
        "prepared key replacement"
    );
    build_key_replacement_entry(chain_id, &old_public, &new_public, &request.signing_secret)
}

#[cfg(test)]
mod tests;
