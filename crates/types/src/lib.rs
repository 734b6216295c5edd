// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # idkeys Types
//!
//! The foundational library for the idkeys workspace, containing the data model
//! for identity chains (entries, checkpoints, cache snapshots), the shared
//! configuration, and every error type surfaced by the other crates.
//!
//! ## Architectural Role
//!
//! As the base crate, `idkeys-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Keeping the shared
//! definitions here prevents circular dependencies between the crypto layer,
//! the collaborator traits and the identity state machine.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::IdentityError> = std::result::Result<T, E>;

/// Identity-chain data structures: `Entry`, `Checkpoint`, `CacheSnapshot`, `IdentityChainId`.
pub mod app;
/// Shared configuration structures (e.g., `IdentityConfig`).
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Literal markers that classify entries on an identity chain.
pub mod markers;
