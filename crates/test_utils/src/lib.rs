// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # idkeys Test Utilities
//!
//! Deterministic identity keys, entry builders and collaborator doubles shared
//! by the workspace's tests.

pub mod assertions;
pub mod fixtures;
pub mod mocks;
