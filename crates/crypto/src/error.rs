// Path: crates/crypto/src/error.rs
//! Local error types for the `idkeys-crypto` crate.

// Re-export the canonical error type from the API crate.
pub use idkeys_api::error::CryptoError;
