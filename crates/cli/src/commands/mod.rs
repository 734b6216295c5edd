// Path: crates/cli/src/commands/mod.rs

pub mod entry;
pub mod keys;
pub mod resolve;
