// Path: crates/crypto/src/sign/preimage.rs
//! Detached signatures paired with a versioned public-key pre-image.
//!
//! The pre-image is a one-byte version tag followed by the raw 32-byte Ed25519
//! public key. Verification strips the tag and checks the detached signature
//! against the remaining key bytes.

use super::eddsa::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, ED25519_KEY_LEN, ED25519_SIGNATURE_LEN,
};
use crate::error::CryptoError;
use idkeys_api::crypto::{SerializableKey, SigningKeyPair, VerifyingKey};

/// Version tag prepended to a public key to form its pre-image.
pub const PREIMAGE_VERSION: u8 = 0x01;
/// Length of a public-key pre-image.
pub const PREIMAGE_LEN: usize = 1 + ED25519_KEY_LEN;

/// A signature together with the pre-image of the key that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreimageSignature {
    /// `PREIMAGE_VERSION || public_key`.
    pub public_key_preimage: [u8; PREIMAGE_LEN],
    /// Detached Ed25519 signature over the message.
    pub signature: [u8; ED25519_SIGNATURE_LEN],
}

/// Derives the Ed25519 public key of a 32-byte secret seed.
pub fn secret_to_public_key(seed: &[u8; ED25519_KEY_LEN]) -> [u8; ED25519_KEY_LEN] {
    *Ed25519KeyPair::from_seed(seed).public_key().as_bytes()
}

/// Signs `message` with the key derived from `seed`.
pub fn sign(
    seed: &[u8; ED25519_KEY_LEN],
    message: &[u8],
) -> Result<PreimageSignature, CryptoError> {
    let keypair = Ed25519KeyPair::from_seed(seed);
    let mut public_key_preimage = [PREIMAGE_VERSION; PREIMAGE_LEN];
    for (dst, src) in public_key_preimage
        .iter_mut()
        .skip(1)
        .zip(keypair.public_key().as_bytes())
    {
        *dst = *src;
    }

    let signature = keypair.sign(message)?.to_array();
    Ok(PreimageSignature {
        public_key_preimage,
        signature,
    })
}

/// Verifies `signature` over `message` against a public-key pre-image.
///
/// Returns `false` for any malformed input instead of failing.
pub fn verify(public_key_preimage: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match public_key_preimage.split_first() {
        Some((_version, public_key)) => verify_detached(public_key, message, signature),
        None => false,
    }
}

/// Verifies a detached signature against a raw 32-byte public key.
///
/// Returns `false` when the key or signature has the wrong length or fails to parse.
pub fn verify_detached(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != ED25519_SIGNATURE_LEN {
        return false;
    }
    let (Ok(public_key), Ok(signature)) = (
        Ed25519PublicKey::from_bytes(public_key),
        Ed25519Signature::from_bytes(signature),
    ) else {
        log::debug!("rejecting malformed verification input");
        return false;
    };
    public_key.verify(message, &signature).is_ok()
}
