// Path: crates/identity/src/lib.rs
//! # idkeys Identity Crate Lints
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
//! # idkeys Identity
//!
//! Replays an identity chain (a genesis entry declaring prioritized keys,
//! followed by signed key replacements) into the set of keys active at any
//! block height.
//!
//! - [`genesis`] validates the first entry of a chain.
//! - [`rotation`] decides whether a key replacement is applied.
//! - [`cache`] stores the resulting states by height.
//! - [`resolver`] ties them to an [`EntrySource`](idkeys_api::source::EntrySource)
//!   and a [`CacheSink`](idkeys_api::persist::CacheSink).

pub mod cache;
pub mod genesis;
pub mod management;
pub mod persist;
pub mod resolver;
pub mod rotation;
pub mod source;

pub use cache::HeightIndexedCache;
pub use resolver::IdentityResolver;
pub use rotation::{KeyState, RejectReason, RotationCandidate, RotationEngine, RotationOutcome};
