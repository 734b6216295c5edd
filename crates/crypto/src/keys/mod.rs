// Path: crates/crypto/src/keys/mod.rs
//! Human-readable, checksummed identity keys.
//!
//! An identity key is `base58(prefix || payload || checksum)` where `prefix` is a
//! 5-byte type tag, `payload` is a 32-byte Ed25519 public key or secret seed, and
//! `checksum` is the first 4 bytes of `sha256d(prefix || payload)`. The prefixes
//! are chosen so that encoded keys start with `idpub` or `idsec`.

pub mod server;

use crate::algorithms::hash::{checksum, CHECKSUM_LEN};
use crate::error::CryptoError;
use crate::sign::eddsa::ED25519_KEY_LEN;
use crate::sign::preimage::secret_to_public_key;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

const PREFIX_LEN: usize = 5;

/// Decoded length of an identity key: prefix, payload and checksum.
pub const IDENTITY_KEY_DECODED_LEN: usize = PREFIX_LEN + ED25519_KEY_LEN + CHECKSUM_LEN;

/// The role of an identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKeyKind {
    /// Carries an Ed25519 public key.
    Public,
    /// Carries an Ed25519 secret seed.
    Secret,
}

impl IdentityKeyKind {
    /// The textual tag every encoded key of this kind starts with.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Public => "idpub",
            Self::Secret => "idsec",
        }
    }

    /// The binary type prefix of this kind.
    pub fn prefix(self) -> [u8; PREFIX_LEN] {
        match self {
            Self::Public => [0x03, 0x45, 0xef, 0x9d, 0xe0],
            Self::Secret => [0x03, 0x45, 0xf3, 0xd0, 0xd6],
        }
    }

    fn from_tag(key: &str) -> Option<Self> {
        [Self::Public, Self::Secret]
            .into_iter()
            .find(|kind| key.starts_with(kind.tag()))
    }
}

/// A public identity key with its secret counterpart.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityKeyPair {
    /// `idpub...` form.
    pub public: String,
    /// `idsec...` form.
    pub secret: String,
}

impl core::fmt::Debug for IdentityKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityKeyPair")
            .field("public", &self.public)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Decodes and fully validates `key`, returning its kind and 32-byte payload.
fn decode(key: &str) -> Option<(IdentityKeyKind, [u8; ED25519_KEY_LEN])> {
    let kind = IdentityKeyKind::from_tag(key)?;
    let bytes = Zeroizing::new(bs58::decode(key).into_vec().ok()?);
    if bytes.len() != IDENTITY_KEY_DECODED_LEN {
        return None;
    }
    let (body, check) = bytes.split_at(PREFIX_LEN + ED25519_KEY_LEN);
    if checksum(body) != check {
        return None;
    }
    let payload = body.get(PREFIX_LEN..)?.try_into().ok()?;
    Some((kind, payload))
}

/// Checks that `key` is a well-formed public or secret identity key.
pub fn is_valid_identity_key(key: &str) -> bool {
    decode(key).is_some()
}

/// Checks that `key` is a well-formed public identity key.
pub fn is_valid_public_identity_key(key: &str) -> bool {
    matches!(decode(key), Some((IdentityKeyKind::Public, _)))
}

/// Checks that `key` is a well-formed secret identity key.
pub fn is_valid_secret_identity_key(key: &str) -> bool {
    matches!(decode(key), Some((IdentityKeyKind::Secret, _)))
}

/// Returns the Ed25519 public key or secret seed embedded in an identity key.
pub fn extract_crypto_material(key: &str) -> Result<[u8; ED25519_KEY_LEN], CryptoError> {
    decode(key)
        .map(|(_, payload)| payload)
        .ok_or_else(|| CryptoError::InvalidKey(format!("Invalid identity key {}.", key)))
}

/// Returns the public identity key for a public or secret identity key.
pub fn public_identity_key(key: &str) -> Result<String, CryptoError> {
    match decode(key) {
        Some((IdentityKeyKind::Public, _)) => Ok(key.to_string()),
        Some((IdentityKeyKind::Secret, seed)) => {
            let seed = Zeroizing::new(seed);
            Ok(key_to_public_identity_key(&secret_to_public_key(&seed)))
        }
        None => Err(CryptoError::InvalidKey(format!(
            "Invalid identity key: {}",
            key
        ))),
    }
}

/// Encodes a raw 32-byte Ed25519 public key as a public identity key.
pub fn key_to_public_identity_key(key: &[u8; ED25519_KEY_LEN]) -> String {
    encode(IdentityKeyKind::Public, key)
}

/// Encodes a raw 32-byte secret seed as a secret identity key.
pub fn seed_to_secret_identity_key(seed: &[u8; ED25519_KEY_LEN]) -> String {
    encode(IdentityKeyKind::Secret, seed)
}

fn encode(kind: IdentityKeyKind, payload: &[u8; ED25519_KEY_LEN]) -> String {
    let mut bytes = Zeroizing::new(Vec::with_capacity(IDENTITY_KEY_DECODED_LEN));
    bytes.extend_from_slice(&kind.prefix());
    bytes.extend_from_slice(payload);
    let check = checksum(bytes.as_slice());
    bytes.extend_from_slice(&check);
    bs58::encode(bytes.as_slice()).into_string()
}

/// Derives the full key pair of a secret identity key.
pub fn identity_key_pair_from_secret(secret: &str) -> Result<IdentityKeyPair, CryptoError> {
    if !is_valid_secret_identity_key(secret) {
        return Err(CryptoError::InvalidKey(format!(
            "{} is not a valid secret identity key",
            secret
        )));
    }
    Ok(IdentityKeyPair {
        public: public_identity_key(secret)?,
        secret: secret.to_string(),
    })
}

/// Generates a random identity key pair from a fresh 32-byte seed.
pub fn generate_random_identity_key_pair() -> Result<IdentityKeyPair, CryptoError> {
    let mut seed = Zeroizing::new([0u8; ED25519_KEY_LEN]);
    OsRng
        .try_fill_bytes(&mut *seed)
        .map_err(|e| CryptoError::InvalidKey(format!("Failed to draw a random seed: {}", e)))?;
    Ok(IdentityKeyPair {
        public: key_to_public_identity_key(&secret_to_public_key(&seed)),
        secret: seed_to_secret_identity_key(&seed),
    })
}
