// Path: crates/identity/src/genesis.rs
//! Parses the first entry of an identity chain into its initial key set.

use idkeys_api::error::IdentityError;
use idkeys_crypto::keys::is_valid_public_identity_key;
use idkeys_types::app::Entry;
use idkeys_types::markers::{GENESIS_CONTENT_VERSION, IDENTITY_CHAIN_MARKER};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GenesisContent {
    version: serde_json::Number,
    keys: Vec<String>,
}

/// What a valid genesis entry declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisState {
    /// Initial active keys. Priority is the position in this list.
    pub keys: Vec<String>,
    /// The identity's name: every external id after the marker.
    pub name: Vec<Vec<u8>>,
}

/// JSON does not distinguish `1` from `1.0`, so the version is compared numerically.
fn is_supported_version(version: &serde_json::Number) -> bool {
    version.as_u64() == Some(GENESIS_CONTENT_VERSION)
        || version
            .as_f64()
            .is_some_and(|v| v == GENESIS_CONTENT_VERSION as f64)
}

/// Validates `entry` as an identity declaration and returns its initial state.
///
/// The content must be `{"version": 1, "keys": [...]}` with at least one key, no
/// duplicates, and only valid public identity keys.
pub fn parse_genesis(entry: &Entry) -> Result<GenesisState, IdentityError> {
    let invalid = |reason: String| IdentityError::InvalidGenesis {
        entry_hash: entry.hash.to_string(),
        reason,
    };

    if entry.marker() != Some(IDENTITY_CHAIN_MARKER) {
        return Err(invalid("first external id is not IdentityChain".into()));
    }

    let content: GenesisContent = serde_json::from_slice(&entry.content)
        .map_err(|e| invalid(format!("malformed content: {}", e)))?;

    if !is_supported_version(&content.version) {
        return Err(invalid(format!(
            "unsupported version {}, expected {}",
            content.version, GENESIS_CONTENT_VERSION
        )));
    }
    if content.keys.is_empty() {
        return Err(invalid("keys must contain at least one key".into()));
    }

    let mut seen = BTreeSet::new();
    for key in &content.keys {
        if !is_valid_public_identity_key(key) {
            return Err(invalid(format!("{} is not a valid public identity key", key)));
        }
        if !seen.insert(key.as_str()) {
            return Err(invalid(format!("duplicate key {}", key)));
        }
    }

    Ok(GenesisState {
        keys: content.keys,
        name: entry.ext_ids.iter().skip(1).cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use idkeys_test_utils::assert_err;
    use idkeys_test_utils::fixtures::{
        genesis_entry, genesis_entry_with_content, identity_keys, public_keys,
        rotation_entry_with_signature,
    };

    fn reason_of(err: IdentityError) -> String {
        match err {
            IdentityError::InvalidGenesis { reason, .. } => reason,
            other => panic!("expected InvalidGenesis, got {:?}", other),
        }
    }

    #[test]
    fn test_parses_keys_in_order_and_name() {
        let keys = public_keys(&identity_keys(3));
        let entry = genesis_entry(&["Acme", "Corp"], &keys, 1);
        let state = parse_genesis(&entry).unwrap();
        assert_eq!(state.keys, keys);
        assert_eq!(state.name, vec![b"Acme".to_vec(), b"Corp".to_vec()]);
    }

    #[test]
    fn test_rejects_wrong_marker() {
        let keys = public_keys(&identity_keys(1));
        let entry = rotation_entry_with_signature(&keys[0], &keys[0], vec![0; 64], &keys[0], 1);
        let reason = reason_of(assert_err!(parse_genesis(&entry)));
        assert!(reason.contains("IdentityChain"));
    }

    #[test]
    fn test_rejects_malformed_content() {
        for content in ["", "not json", "[]", "{\"version\":1}", "{\"keys\":[]}"] {
            let entry = genesis_entry_with_content(&["n"], content, 1);
            assert!(
                matches!(parse_genesis(&entry), Err(IdentityError::InvalidGenesis { .. })),
                "content {:?} should be rejected",
                content
            );
        }
    }

    #[test]
    fn test_rejects_unknown_fields_and_bad_version() {
        let keys = public_keys(&identity_keys(1));
        let extra = serde_json::json!({"version": 1, "keys": keys, "extra": true}).to_string();
        assert!(parse_genesis(&genesis_entry_with_content(&[], &extra, 1)).is_err());

        let v2 = serde_json::json!({"version": 2, "keys": keys}).to_string();
        let reason = reason_of(assert_err!(parse_genesis(&genesis_entry_with_content(&[], &v2, 1))));
        assert!(reason.contains("version 2"));
    }

    #[test]
    fn test_version_is_compared_numerically() {
        let keys = public_keys(&identity_keys(2));
        let float_one = format!(r#"{{"version":1.0,"keys":{}}}"#, serde_json::json!(keys));
        let state = parse_genesis(&genesis_entry_with_content(&["n"], &float_one, 1)).unwrap();
        assert_eq!(state.keys, keys);

        let fractional = serde_json::json!({"version": 1.5, "keys": keys}).to_string();
        let reason = reason_of(assert_err!(parse_genesis(&genesis_entry_with_content(
            &[],
            &fractional,
            1
        ))));
        assert!(reason.contains("version 1.5"));

        let text = serde_json::json!({"version": "1", "keys": keys}).to_string();
        let reason = reason_of(assert_err!(parse_genesis(&genesis_entry_with_content(&[], &text, 1))));
        assert!(reason.contains("malformed content"));
    }

    #[test]
    fn test_rejects_empty_duplicate_or_invalid_keys() {
        let empty = genesis_entry(&[], &[], 1);
        assert!(reason_of(assert_err!(parse_genesis(&empty))).contains("at least one"));

        let mut keys = public_keys(&identity_keys(2));
        keys.push(keys[0].clone());
        let dup = genesis_entry(&[], &keys, 1);
        assert!(reason_of(assert_err!(parse_genesis(&dup))).contains("duplicate"));

        let mut keys = public_keys(&identity_keys(2));
        keys.push("NOT A VALID PUBLIC KEY".into());
        let bad = genesis_entry(&[], &keys, 1);
        assert!(reason_of(assert_err!(parse_genesis(&bad))).contains("NOT A VALID PUBLIC KEY"));

        let secret = identity_keys(1).remove(0).secret;
        let secret_entry = genesis_entry(&[], &[secret], 1);
        assert!(parse_genesis(&secret_entry).is_err());
    }

    #[test]
    fn test_error_carries_entry_hash() {
        let entry = genesis_entry_with_content(&[], "oops", 9);
        match parse_genesis(&entry) {
            Err(IdentityError::InvalidGenesis { entry_hash, .. }) => {
                assert_eq!(entry_hash, entry.hash.to_string())
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
