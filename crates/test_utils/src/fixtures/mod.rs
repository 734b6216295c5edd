//! Identity keys and chain entries for reproducible tests

use idkeys_crypto::algorithms::hash::sha256;
use idkeys_crypto::error::CryptoError;
use idkeys_crypto::keys::{
    extract_crypto_material, key_to_public_identity_key, seed_to_secret_identity_key,
    IdentityKeyPair,
};
use idkeys_crypto::sign::preimage::{secret_to_public_key, sign};
use idkeys_types::app::{BlockContext, Entry, EntryHash, IdentityChainId};
use idkeys_types::markers::{IDENTITY_CHAIN_MARKER, REPLACE_KEY_MARKER};
use rand::RngCore;

/// A deterministic identity key pair derived from the seed `[index; 32]`.
pub fn identity_key(index: u8) -> IdentityKeyPair {
    let seed = [index; 32];
    IdentityKeyPair {
        public: key_to_public_identity_key(&secret_to_public_key(&seed)),
        secret: seed_to_secret_identity_key(&seed),
    }
}

/// `count` distinct deterministic key pairs, seeded with indexes `1..=count`.
pub fn identity_keys(count: u8) -> Vec<IdentityKeyPair> {
    (1..=count).map(identity_key).collect()
}

/// The public halves of `pairs`, in order.
pub fn public_keys(pairs: &[IdentityKeyPair]) -> Vec<String> {
    pairs.iter().map(|p| p.public.clone()).collect()
}

/// A chain id made of 32 repeated `tag` bytes, hex-encoded.
pub fn fixed_chain_id(tag: u8) -> IdentityChainId {
    IdentityChainId::new(hex::encode([tag; 32]))
}

/// A random 32-byte chain id, hex-encoded.
pub fn random_chain_id() -> IdentityChainId {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    IdentityChainId::new(hex::encode(bytes))
}

/// Builds an entry at `height`, hashing its fields into a stable entry hash.
pub fn entry_at(ext_ids: Vec<Vec<u8>>, content: Vec<u8>, height: u64) -> Entry {
    let mut preimage = height.to_be_bytes().to_vec();
    for ext_id in &ext_ids {
        preimage.extend_from_slice(&sha256(ext_id));
    }
    preimage.extend_from_slice(&content);
    Entry {
        ext_ids,
        content,
        hash: EntryHash(sha256(preimage)),
        block_context: BlockContext {
            directory_block_height: height,
            entry_timestamp: None,
        },
    }
}

/// A genesis entry declaring `keys` under the given name parts.
pub fn genesis_entry(name: &[&str], keys: &[String], height: u64) -> Entry {
    let content = serde_json::json!({ "version": 1, "keys": keys }).to_string();
    genesis_entry_with_content(name, &content, height)
}

/// A genesis entry with arbitrary content, for exercising parser failures.
pub fn genesis_entry_with_content(name: &[&str], content: &str, height: u64) -> Entry {
    let mut ext_ids = vec![IDENTITY_CHAIN_MARKER.to_vec()];
    ext_ids.extend(name.iter().map(|n| n.as_bytes().to_vec()));
    entry_at(ext_ids, content.as_bytes().to_vec(), height)
}

/// A correctly signed rotation replacing `old` with `new`, signed by `signer`.
pub fn rotation_entry(
    chain_id: &IdentityChainId,
    old: &str,
    new: &str,
    signer: &IdentityKeyPair,
    height: u64,
) -> Result<Entry, CryptoError> {
    let seed = extract_crypto_material(&signer.secret)?;
    let message = [chain_id.as_str(), old, new].concat();
    let signed = sign(&seed, message.as_bytes())?;
    Ok(rotation_entry_with_signature(
        old,
        new,
        signed.signature.to_vec(),
        &signer.public,
        height,
    ))
}

/// A rotation carrying an arbitrary signature and signer field.
pub fn rotation_entry_with_signature(
    old: &str,
    new: &str,
    signature: Vec<u8>,
    signer_public: &str,
    height: u64,
) -> Entry {
    entry_at(
        vec![
            REPLACE_KEY_MARKER.to_vec(),
            old.as_bytes().to_vec(),
            new.as_bytes().to_vec(),
            signature,
            signer_public.as_bytes().to_vec(),
        ],
        Vec::new(),
        height,
    )
}

/// An entry whose first external id is not an identity marker.
pub fn garbage_entry(height: u64) -> Entry {
    entry_at(
        vec![b"Garbage".to_vec(), b"noise".to_vec()],
        b"not an identity entry".to_vec(),
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use idkeys_crypto::keys::{is_valid_public_identity_key, public_identity_key};
    use idkeys_crypto::sign::preimage::verify_detached;

    #[test]
    fn test_identity_keys_are_distinct_and_valid() {
        let keys = identity_keys(4);
        assert_eq!(keys.len(), 4);
        for pair in &keys {
            assert!(is_valid_public_identity_key(&pair.public));
            assert_eq!(public_identity_key(&pair.secret).unwrap(), pair.public);
        }
        let mut publics = public_keys(&keys);
        publics.dedup();
        assert_eq!(publics.len(), 4);
    }

    #[test]
    fn test_rotation_entry_signature_verifies() {
        let chain = fixed_chain_id(0xab);
        let keys = identity_keys(3);
        let entry = rotation_entry(&chain, &keys[1].public, &keys[2].public, &keys[0], 5).unwrap();

        assert_eq!(entry.ext_ids.len(), 5);
        assert_eq!(entry.height(), 5);
        let message = format!("{}{}{}", chain, keys[1].public, keys[2].public);
        let signer = extract_crypto_material(&keys[0].public).unwrap();
        assert!(verify_detached(&signer, message.as_bytes(), &entry.ext_ids[3]));
    }

    #[test]
    fn test_entry_hashes_differ_by_height() {
        assert_ne!(garbage_entry(1).hash, garbage_entry(2).hash);
        assert!(!garbage_entry(1).is_identity_entry());
        assert!(genesis_entry(&["n"], &[], 1).is_identity_entry());
    }
}
