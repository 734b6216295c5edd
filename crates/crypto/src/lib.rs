// Path: crates/crypto/src/lib.rs
//! # idkeys Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote robust
//! error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # idkeys Cryptography
//!
//! The checksummed identity key codec, double-SHA-256 hashing, and the Ed25519
//! signing and verification used by identity chains.

pub mod algorithms;
pub mod error;
pub mod keys;
pub mod sign;
