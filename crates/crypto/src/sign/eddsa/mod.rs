// Path: crates/crypto/src/sign/eddsa/mod.rs
//! Ed25519 signatures backed by `ed25519-dalek`.

use crate::error::CryptoError;
use ed25519_dalek::{Signer, Verifier};
use idkeys_api::crypto::{SerializableKey, Signature, SigningKey, SigningKeyPair, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Length of an Ed25519 public key or secret seed.
pub const ED25519_KEY_LEN: usize = 32;
/// Length of a detached Ed25519 signature.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Ed25519 key pair implementation
#[derive(Clone)]
pub struct Ed25519KeyPair {
    /// Private signing key; the public half is derived on demand.
    signing_key: ed25519_dalek::SigningKey,
}

/// Ed25519 signature implementation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519Signature(ed25519_dalek::Signature);

/// Ed25519 public key implementation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey(ed25519_dalek::VerifyingKey);

/// Ed25519 private key implementation
#[derive(Clone)]
pub struct Ed25519PrivateKey(ed25519_dalek::SigningKey);

impl Ed25519KeyPair {
    /// Generate a new Ed25519 key pair from a random seed.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = Zeroizing::new([0u8; ED25519_KEY_LEN]);
        OsRng
            .try_fill_bytes(&mut *seed)
            .map_err(|e| CryptoError::InvalidKey(format!("Failed to draw a random seed: {}", e)))?;
        Ok(Self::from_seed(&seed))
    }

    /// Deterministically derive a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; ED25519_KEY_LEN]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create from an existing private key
    pub fn from_private_key(private_key: &Ed25519PrivateKey) -> Self {
        Self {
            signing_key: private_key.0.clone(),
        }
    }
}

impl SigningKeyPair for Ed25519KeyPair {
    type PublicKey = Ed25519PublicKey;
    type PrivateKey = Ed25519PrivateKey;
    type Signature = Ed25519Signature;

    fn public_key(&self) -> Self::PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key())
    }

    fn private_key(&self) -> Self::PrivateKey {
        Ed25519PrivateKey(self.signing_key.clone())
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        Ok(Ed25519Signature(self.signing_key.sign(message)))
    }
}

impl VerifyingKey for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Self::Signature) -> Result<(), CryptoError> {
        self.0
            .verify(message, &signature.0)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl SerializableKey for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: &[u8; ED25519_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Invalid public key length: expected {} bytes, got {}",
                ED25519_KEY_LEN,
                bytes.len()
            ))
        })?;
        ed25519_dalek::VerifyingKey::from_bytes(raw)
            .map(Ed25519PublicKey)
            .map_err(|e| CryptoError::InvalidKey(format!("Failed to parse public key: {}", e)))
    }
}

impl SigningKey for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        Ok(Ed25519Signature(self.0.sign(message)))
    }
}

impl SerializableKey for Ed25519PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        // Export just the seed (32 bytes)
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: &[u8; ED25519_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Invalid private key length: expected 32 bytes".to_string())
        })?;
        Ok(Ed25519PrivateKey(ed25519_dalek::SigningKey::from_bytes(seed)))
    }
}

impl SerializableKey for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        ed25519_dalek::Signature::from_slice(bytes)
            .map(Ed25519Signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("Failed to parse signature: {}", e)))
    }
}

impl Signature for Ed25519Signature {}

impl Ed25519Signature {
    /// Get the raw signature bytes
    pub fn to_array(&self) -> [u8; ED25519_SIGNATURE_LEN] {
        self.0.to_bytes()
    }
}

impl Ed25519PublicKey {
    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8; ED25519_KEY_LEN] {
        self.0.as_bytes()
    }
}

impl Ed25519PrivateKey {
    /// Get the raw private key seed bytes (32 bytes)
    pub fn as_bytes(&self) -> &[u8; ED25519_KEY_LEN] {
        self.0.as_bytes()
    }

    /// Get the public key corresponding to this private key
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.0.verifying_key())
    }
}

#[cfg(test)]
mod tests;
