// Path: crates/crypto/src/keys/server.rs
//! Server identity keys (`sk1`..`sk4`, `id1`..`id4`).
//!
//! These use a 3-byte prefix in place of the 5-byte one, so an encoded key is
//! 39 bytes. Keys are accepted either in base58 form or as raw hex.

use crate::algorithms::hash::{checksum, CHECKSUM_LEN};
use crate::error::CryptoError;
use crate::sign::eddsa::ED25519_KEY_LEN;
use zeroize::Zeroizing;

const PREFIX_LEN: usize = 3;

/// Decoded length of a server key.
pub const SERVER_KEY_DECODED_LEN: usize = PREFIX_LEN + ED25519_KEY_LEN + CHECKSUM_LEN;

/// Required length of a server identity chain id, in hex characters.
pub const SERVER_IDENTITY_CHAIN_ID_LEN: usize = 64;

/// Every server identity chain id starts with this.
pub const SERVER_IDENTITY_CHAIN_ID_PREFIX: &str = "888888";

/// The eight server key levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerKeyKind {
    /// Level 1 secret key.
    Sk1,
    /// Level 2 secret key.
    Sk2,
    /// Level 3 secret key.
    Sk3,
    /// Level 4 secret key.
    Sk4,
    /// Level 1 public key.
    Id1,
    /// Level 2 public key.
    Id2,
    /// Level 3 public key.
    Id3,
    /// Level 4 public key.
    Id4,
}

impl ServerKeyKind {
    /// All kinds, in level order with secret keys first.
    pub const ALL: [ServerKeyKind; 8] = [
        Self::Sk1,
        Self::Sk2,
        Self::Sk3,
        Self::Sk4,
        Self::Id1,
        Self::Id2,
        Self::Id3,
        Self::Id4,
    ];

    /// The 3-character tag of the base58 form.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sk1 => "sk1",
            Self::Sk2 => "sk2",
            Self::Sk3 => "sk3",
            Self::Sk4 => "sk4",
            Self::Id1 => "id1",
            Self::Id2 => "id2",
            Self::Id3 => "id3",
            Self::Id4 => "id4",
        }
    }

    /// The binary prefix.
    pub fn prefix(self) -> [u8; PREFIX_LEN] {
        match self {
            Self::Sk1 => [0x4d, 0xb6, 0xc9],
            Self::Sk2 => [0x4d, 0xb6, 0xe7],
            Self::Sk3 => [0x4d, 0xb7, 0x05],
            Self::Sk4 => [0x4d, 0xb7, 0x23],
            Self::Id1 => [0x3f, 0xbe, 0xba],
            Self::Id2 => [0x3f, 0xbe, 0xd8],
            Self::Id3 => [0x3f, 0xbe, 0xf6],
            Self::Id4 => [0x3f, 0xbf, 0x14],
        }
    }

    /// Parses a tag such as `"sk2"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    fn decode(self, key: &str) -> Option<Zeroizing<Vec<u8>>> {
        if key.starts_with(self.tag()) {
            bs58::decode(key).into_vec().ok().map(Zeroizing::new)
        } else if key.starts_with(&hex::encode(self.prefix())) {
            hex::decode(key).ok().map(Zeroizing::new)
        } else {
            None
        }
    }
}

fn decode_checked(kind: ServerKeyKind, key: &str) -> Option<[u8; ED25519_KEY_LEN]> {
    let bytes = kind.decode(key)?;
    if bytes.len() != SERVER_KEY_DECODED_LEN {
        return None;
    }
    let (body, check) = bytes.split_at(PREFIX_LEN + ED25519_KEY_LEN);
    if checksum(body) != check {
        return None;
    }
    body.get(PREFIX_LEN..)?.try_into().ok()
}

/// Checks that `key` is a well-formed server key of the given kind, in base58 or hex form.
pub fn is_valid_server_key(kind: ServerKeyKind, key: &str) -> bool {
    decode_checked(kind, key).is_some()
}

/// Returns the 32-byte payload of a server key.
pub fn extract_server_key_material(
    kind: ServerKeyKind,
    key: &str,
) -> Result<[u8; ED25519_KEY_LEN], CryptoError> {
    decode_checked(kind, key).ok_or_else(|| {
        CryptoError::InvalidKey(format!("Invalid {} server key {}.", kind.tag(), key))
    })
}

/// Encodes a 32-byte payload as a base58 server key of the given kind.
pub fn server_key_from_material(kind: ServerKeyKind, material: &[u8; ED25519_KEY_LEN]) -> String {
    let mut bytes = Zeroizing::new(Vec::with_capacity(SERVER_KEY_DECODED_LEN));
    bytes.extend_from_slice(&kind.prefix());
    bytes.extend_from_slice(material);
    let check = checksum(bytes.as_slice());
    bytes.extend_from_slice(&check);
    bs58::encode(bytes.as_slice()).into_string()
}

/// Checks the shape of a server identity chain id: 64 characters beginning with `888888`.
pub fn is_valid_server_identity_chain_id(chain_id: &str) -> bool {
    chain_id.len() == SERVER_IDENTITY_CHAIN_ID_LEN
        && chain_id.starts_with(SERVER_IDENTITY_CHAIN_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SK1_SEED: &str = "sk11pz9zZQ32XHuLYhpTAK5zXfahYxvjixXUYWssZEXPZUZvWS1pp";
    const SK1_FF: &str = "sk13mjEPiBP6rEnC5TWQSY7qUTtnjbKb4QcpEZ7jNDJVvsupCg9DV";
    const SK1_ZERO: &str = "sk11pz4AG9XgB1eNVkbppYAWsgyg7sftDXqBASsagKJqvVRKYodCU";
    const SK4_SEED: &str = "sk42mz2rxGjKPg3ArBQd2EvrVMzxybS7ZmLzvCqMTuzNANyuRMBGe";
    const ID1_SEED: &str = "id11qFPwxtXSiJQfuVGHMTPsr65ZbwjXXgwGPvpggwTWEmTF7ntAK";
    const ID4_SEED: &str = "id42nFGpMmDjagYWCxrTDPEjonVq2aEuNVknmcnAbcvUqfsFRabxx";

    fn seed() -> [u8; 32] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(server_key_from_material(ServerKeyKind::Sk1, &seed()), SK1_SEED);
        assert_eq!(server_key_from_material(ServerKeyKind::Sk1, &[0xff; 32]), SK1_FF);
        assert_eq!(server_key_from_material(ServerKeyKind::Sk1, &[0; 32]), SK1_ZERO);
        assert_eq!(server_key_from_material(ServerKeyKind::Sk4, &seed()), SK4_SEED);
        assert_eq!(server_key_from_material(ServerKeyKind::Id1, &seed()), ID1_SEED);
        assert_eq!(server_key_from_material(ServerKeyKind::Id4, &seed()), ID4_SEED);
    }

    #[test]
    fn test_validation_is_kind_specific() {
        assert!(is_valid_server_key(ServerKeyKind::Sk1, SK1_SEED));
        assert!(!is_valid_server_key(ServerKeyKind::Sk2, SK1_SEED));
        assert!(!is_valid_server_key(ServerKeyKind::Id1, SK1_SEED));
        assert!(is_valid_server_key(ServerKeyKind::Id4, ID4_SEED));
        assert!(!is_valid_server_key(ServerKeyKind::Sk1, "idpub1nQ9sne3u54CjxUPEbh7wW6zSj4T1vxaTDQ23qGvGvM4Kj2iPq"));
    }

    #[test]
    fn test_hex_form_is_accepted() {
        let mut body = ServerKeyKind::Sk1.prefix().to_vec();
        body.extend_from_slice(&seed());
        let check = checksum(&body);
        body.extend_from_slice(&check);
        let hex_key = hex::encode(&body);
        assert!(hex_key.starts_with("4db6c9"));
        assert!(is_valid_server_key(ServerKeyKind::Sk1, &hex_key));
        assert_eq!(
            extract_server_key_material(ServerKeyKind::Sk1, &hex_key).unwrap(),
            seed()
        );

        // Same bytes with a broken checksum.
        let mut broken = body.clone();
        if let Some(last) = broken.last_mut() {
            *last ^= 0x01;
        }
        assert!(!is_valid_server_key(ServerKeyKind::Sk1, &hex::encode(broken)));
        // Odd-length hex.
        assert!(!is_valid_server_key(ServerKeyKind::Sk1, "4db6c9abc"));
    }

    #[test]
    fn test_extract_material() {
        assert_eq!(
            extract_server_key_material(ServerKeyKind::Sk1, SK1_FF).unwrap(),
            [0xff; 32]
        );
        assert!(extract_server_key_material(ServerKeyKind::Sk3, SK1_FF).is_err());
    }

    #[test]
    fn test_tag_lookup() {
        assert_eq!(ServerKeyKind::from_tag("sk3"), Some(ServerKeyKind::Sk3));
        assert_eq!(ServerKeyKind::from_tag("id2"), Some(ServerKeyKind::Id2));
        assert_eq!(ServerKeyKind::from_tag("sk5"), None);
    }

    #[test]
    fn test_server_identity_chain_id() {
        let good = format!("888888{}", "a".repeat(58));
        assert!(is_valid_server_identity_chain_id(&good));
        assert!(!is_valid_server_identity_chain_id(&good[..63]));
        let wrong_prefix = format!("888887{}", "a".repeat(58));
        assert!(!is_valid_server_identity_chain_id(&wrong_prefix));
        assert!(!is_valid_server_identity_chain_id(""));
    }
}
