// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use idkeys_types::error::{ConfigError, CryptoError, ErrorCode, IdentityError};
pub use idkeys_types::Result;
