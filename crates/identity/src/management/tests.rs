// Path: crates/identity/src/management/tests.rs
use super::*;
use crate::genesis::parse_genesis;
use crate::rotation::{KeyState, RotationCandidate, RotationEngine};
use crate::source::MemoryEntrySource;
use idkeys_test_utils::assert_err;
use idkeys_test_utils::fixtures::{fixed_chain_id, genesis_entry, identity_keys, public_keys};
use idkeys_types::config::{IdentityConfig, SignerPriority};

#[test]
fn test_identity_chain_entry_parses_back() {
    let keys = public_keys(&identity_keys(3));
    let name = vec![b"Acme".to_vec(), b"Corp".to_vec()];
    let new_entry = build_identity_chain_entry(&name, &keys).unwrap();

    assert_eq!(new_entry.ext_ids[0], b"IdentityChain".to_vec());
    assert_eq!(new_entry.chain_id, Some(chain_id_for(&new_entry.ext_ids)));

    let entry = new_entry.into_entry(1, EntryHash([1; 32]));
    let genesis = parse_genesis(&entry).unwrap();
    assert_eq!(genesis.keys, keys);
    assert_eq!(genesis.name, name);
}

#[test]
fn test_chain_id_is_hash_of_ext_id_hashes() {
    let ext_ids = vec![b"IdentityChain".to_vec(), b"n".to_vec()];
    let mut expected = sha256(b"IdentityChain").to_vec();
    expected.extend_from_slice(&sha256(b"n"));
    assert_eq!(chain_id_for(&ext_ids).as_str(), hex::encode(sha256(expected)));
    assert_eq!(chain_id_for(&ext_ids).as_str().len(), 64);
}

#[test]
fn test_identity_chain_entry_validates_keys() {
    let keys = identity_keys(2);
    assert!(matches!(
        build_identity_chain_entry(&[], &[]),
        Err(IdentityError::InvalidKey(_))
    ));
    assert!(build_identity_chain_entry(&[], &[keys[0].secret.clone()]).is_err());
    assert!(build_identity_chain_entry(
        &[],
        &[keys[0].public.clone(), keys[0].public.clone()]
    )
    .is_err());
}

#[test]
fn test_replacement_entry_passes_rotation_gates() {
    let chain = fixed_chain_id(7);
    let keys = identity_keys(4);
    let state = KeyState::genesis(public_keys(&keys[..3]));

    // Old and new given in secret form are recorded in public form.
    let new_entry =
        build_key_replacement_entry(&chain, &keys[1].secret, &keys[3].secret, &keys[0].secret)
            .unwrap();
    assert_eq!(new_entry.chain_id.as_ref(), Some(&chain));
    assert_eq!(new_entry.ext_ids.len(), 5);
    assert_eq!(new_entry.ext_ids[1], keys[1].public.as_bytes().to_vec());
    assert_eq!(new_entry.ext_ids[2], keys[3].public.as_bytes().to_vec());
    assert_eq!(new_entry.ext_ids[3].len(), 64);
    assert_eq!(new_entry.ext_ids[4], keys[0].public.as_bytes().to_vec());

    let entry = new_entry.into_entry(5, EntryHash([2; 32]));
    let candidate = RotationCandidate::from_entry(&entry).unwrap();
    assert!(RotationEngine::default()
        .evaluate(&chain, &state, &candidate)
        .is_accepted());
}

#[test]
fn test_replacement_entry_rejects_bad_keys() {
    let chain = fixed_chain_id(7);
    let keys = identity_keys(2);
    assert!(matches!(
        build_key_replacement_entry(&chain, &keys[0].public, &keys[1].public, &keys[0].public),
        Err(IdentityError::InvalidKey(_))
    ));
    assert!(matches!(
        build_key_replacement_entry(&chain, "junk", &keys[1].public, &keys[0].secret),
        Err(IdentityError::InvalidKey(_))
    ));
}

#[test]
fn test_resolve_identity_keys() {
    let generated = resolve_identity_keys(KeySpec::Generate(3)).unwrap();
    assert_eq!(generated.len(), 3);
    assert!(generated.iter().all(|k| k.secret.is_some()));
    assert!(!format!("{:?}", generated[0]).contains(generated[0].secret.as_deref().unwrap()));

    let keys = identity_keys(2);
    let given = resolve_identity_keys(KeySpec::Existing(vec![
        keys[0].public.clone(),
        keys[1].secret.clone(),
    ]))
    .unwrap();
    assert_eq!(
        given,
        vec![
            ResolvedKey {
                public: keys[0].public.clone(),
                secret: None
            },
            ResolvedKey {
                public: keys[1].public.clone(),
                secret: None
            },
        ]
    );

    let err = assert_err!(resolve_identity_keys(KeySpec::Existing(vec!["nope".into()])));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_prepare_identity() {
    let prepared = prepare_identity(&[b"Bot".to_vec()], KeySpec::Generate(2)).unwrap();
    assert_eq!(prepared.keys.len(), 2);
    let genesis = parse_genesis(&prepared.entry.into_entry(1, EntryHash::default())).unwrap();
    assert_eq!(genesis.keys[1], prepared.keys[1].public);
}

fn resolver_with_identity(
    config: IdentityConfig,
) -> (IdentityResolver<MemoryEntrySource>, IdentityChainId, Vec<idkeys_crypto::keys::IdentityKeyPair>) {
    let chain = fixed_chain_id(8);
    let keys = identity_keys(5);
    let source = MemoryEntrySource::new();
    source
        .push(&chain, genesis_entry(&["n"], &public_keys(&keys[..3]), 1))
        .unwrap();
    (IdentityResolver::new(source, config), chain, keys)
}

fn request(old: &str, new: &str, signer: &str) -> KeyReplacementRequest {
    KeyReplacementRequest {
        old_key: old.into(),
        new_key: new.into(),
        signing_secret: signer.into(),
    }
}

#[tokio::test]
async fn test_prepare_key_replacement_preflight() {
    let (mut resolver, chain, keys) = resolver_with_identity(IdentityConfig::default());

    let ok = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[1].public, &keys[3].public, &keys[0].secret),
    )
    .await
    .unwrap();
    assert_eq!(ok.ext_ids.len(), 5);

    let inactive_old = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[4].public, &keys[3].public, &keys[0].secret),
    )
    .await;
    assert!(matches!(inactive_old, Err(IdentityError::Unauthorized(_))));

    let inactive_signer = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[1].public, &keys[3].public, &keys[4].secret),
    )
    .await;
    assert!(matches!(inactive_signer, Err(IdentityError::Unauthorized(_))));

    let low_priority = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[0].public, &keys[3].public, &keys[2].secret),
    )
    .await;
    assert!(matches!(low_priority, Err(IdentityError::Unauthorized(_))));

    let reused = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[1].public, &keys[2].public, &keys[0].secret),
    )
    .await;
    assert!(matches!(reused, Err(IdentityError::InvalidKey(_))));

    let public_signer = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[1].public, &keys[3].public, &keys[0].public),
    )
    .await;
    assert!(matches!(public_signer, Err(IdentityError::InvalidKey(_))));
}

#[tokio::test]
async fn test_prepare_key_replacement_honors_strict_priority() {
    let config = IdentityConfig {
        signer_priority: SignerPriority::StrictlyHigher,
        ..IdentityConfig::default()
    };
    let (mut resolver, chain, keys) = resolver_with_identity(config);
    let self_replace = prepare_key_replacement(
        &mut resolver,
        &chain,
        &request(&keys[1].public, &keys[3].public, &keys[1].secret),
    )
    .await;
    assert!(matches!(self_replace, Err(IdentityError::Unauthorized(_))));
}

#[tokio::test]
async fn test_prepare_key_replacement_unknown_identity() {
    let (mut resolver, _, keys) = resolver_with_identity(IdentityConfig::default());
    let err = prepare_key_replacement(
        &mut resolver,
        &fixed_chain_id(0xee),
        &request(&keys[1].public, &keys[3].public, &keys[0].secret),
    )
    .await;
    assert!(matches!(err, Err(IdentityError::UnknownIdentity(_))));
}

#[test]
fn test_request_debug_redacts_secret() {
    let keys = identity_keys(1);
    let req = request(&keys[0].public, &keys[0].public, &keys[0].secret);
    assert!(!format!("{:?}", req).contains(&keys[0].secret));
}
