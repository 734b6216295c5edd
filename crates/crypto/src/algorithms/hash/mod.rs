// Path: crates/crypto/src/algorithms/hash/mod.rs
//! Hash functions used by the identity key codec.

use sha2::{Digest, Sha256};

/// Length of the checksum appended to encoded keys.
pub const CHECKSUM_LEN: usize = 4;

/// Create a SHA-256 hash of any type that can be referenced as bytes
pub fn sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    Sha256::digest(data.as_ref()).into()
}

/// Double SHA-256, `sha256(sha256(data))`.
pub fn sha256d<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    sha256(sha256(data))
}

/// The first four bytes of `sha256d(data)`.
pub fn checksum<T: AsRef<[u8]>>(data: T) -> [u8; CHECKSUM_LEN] {
    let [a, b, c, d, ..] = sha256d(data);
    [a, b, c, d]
}
