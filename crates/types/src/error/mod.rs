// Path: crates/types/src/error/mod.rs
//! Core error types for idkeys.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from cryptographic operations and identity key handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The signature failed cryptographic verification.
    #[error("Signature verification failed")]
    VerificationFailed,
    /// The provided key material or encoded key is malformed.
    #[error("Invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed.
    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),
    /// A hash digest had an unexpected length.
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength {
        /// The expected digest length.
        expected: usize,
        /// The actual digest length.
        got: usize,
    },
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::VerificationFailed => "CRYPTO_VERIFICATION_FAILED",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidHashLength { .. } => "CRYPTO_INVALID_HASH_LENGTH",
        }
    }
}

/// Errors surfaced by identity key-history queries and their collaborators.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The first entry of the chain is not a well-formed identity declaration.
    #[error("Invalid first entry {entry_hash}: {reason}")]
    InvalidGenesis {
        /// Hex hash of the offending entry.
        entry_hash: String,
        /// What made the entry invalid.
        reason: String,
    },
    /// No identity entries exist for the chain id.
    #[error("Invalid identity chain [{0}]")]
    UnknownIdentity(String),
    /// The requested height predates the identity's genesis entry.
    #[error("Identity chain [{chain_id}] didn't exist at height {height}")]
    ChainNotYetExisting {
        /// The queried chain id.
        chain_id: String,
        /// The requested height.
        height: u64,
    },
    /// A code path that requires a valid identity key received an invalid one.
    #[error("Invalid identity key: {0}")]
    InvalidKey(String),
    /// A management operation is not authorized by the identity's current keys.
    #[error("Unauthorized key operation: {0}")]
    Unauthorized(String),
    /// The external entry log failed to deliver entries.
    #[error("Entry source error: {0}")]
    Source(String),
    /// The persistence callback failed.
    #[error("Cache persistence failed: {0}")]
    Persistence(String),
    /// A serialized cache could not be used to bootstrap a cache.
    #[error("Invalid cache data: {0}")]
    InvalidCache(String),
    /// A checkpoint was appended below the latest stored height.
    #[error("Checkpoint at height {got} would precede the latest checkpoint at height {latest}")]
    CacheOrder {
        /// Height of the latest stored checkpoint.
        latest: u64,
        /// Height of the rejected checkpoint.
        got: u64,
    },
    /// A cryptographic operation failed.
    #[error("Cryptographic operation failed: {0}")]
    Crypto(#[from] CryptoError),
}

impl ErrorCode for IdentityError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidGenesis { .. } => "IDENTITY_INVALID_GENESIS",
            Self::UnknownIdentity(_) => "IDENTITY_UNKNOWN",
            Self::ChainNotYetExisting { .. } => "IDENTITY_CHAIN_NOT_YET_EXISTING",
            Self::InvalidKey(_) => "IDENTITY_INVALID_KEY",
            Self::Unauthorized(_) => "IDENTITY_UNAUTHORIZED",
            Self::Source(_) => "IDENTITY_SOURCE_ERROR",
            Self::Persistence(_) => "IDENTITY_PERSISTENCE_FAILED",
            Self::InvalidCache(_) => "IDENTITY_INVALID_CACHE",
            Self::CacheOrder { .. } => "IDENTITY_CACHE_ORDER",
            Self::Crypto(_) => "IDENTITY_CRYPTO_ERROR",
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(e: serde_json::Error) -> Self {
        IdentityError::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for IdentityError {
    fn from(e: std::io::Error) -> Self {
        IdentityError::Persistence(e.to_string())
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for the expected schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG_IO_ERROR",
            Self::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }
}
