// Path: crates/types/src/markers.rs
//! Literal markers that classify entries on an identity chain.

/// First external id of the genesis entry declaring an identity's initial keys.
pub const IDENTITY_CHAIN_MARKER: &[u8] = b"IdentityChain";

/// First external id of a key replacement entry.
pub const REPLACE_KEY_MARKER: &[u8] = b"ReplaceKey";

/// Exact number of external ids carried by a well-formed key replacement entry:
/// `[marker, old_key, new_key, signature, signing_key]`.
pub const REPLACE_KEY_EXT_ID_COUNT: usize = 5;

/// Length in bytes of a detached Ed25519 signature carried by a replacement entry.
pub const SIGNATURE_LEN: usize = 64;

/// The only genesis content version understood by the initial-state parser.
pub const GENESIS_CONTENT_VERSION: u64 = 1;
