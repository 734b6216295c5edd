// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for identity chains.

mod chain;
mod checkpoint;
mod entry;

pub use chain::*;
pub use checkpoint::*;
pub use entry::*;
