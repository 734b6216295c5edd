// Path: crates/api/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # idkeys API
//!
//! Trait seams between the identity state machine and the outside world: the
//! entry log it reads, the sink it persists to, and the signature primitives it
//! verifies with. Concrete implementations live in `idkeys-crypto` and
//! `idkeys-identity`.

/// Unified traits for cryptographic primitives.
pub mod crypto;
/// Re-exports of the workspace error types.
pub mod error;
/// The persistence callback invoked after cache mutations.
pub mod persist;
/// The external, append-only entry log.
pub mod source;
