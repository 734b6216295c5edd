// Path: crates/crypto/src/sign/eddsa/tests/mod.rs
use super::*;

#[test]
fn test_keypair_generation() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair.sign(message).unwrap();

    let public_key = keypair.public_key();
    assert!(public_key.verify(message, &signature).is_ok());
}

#[test]
fn test_seed_derivation_known_vector() {
    let seed: [u8; 32] = core::array::from_fn(|i| i as u8);
    let keypair = Ed25519KeyPair::from_seed(&seed);
    assert_eq!(
        hex::encode(keypair.public_key().as_bytes()),
        "03a107bff3ce10be1d70dd18e74bc09967e4d6309ba50d5f1ddc8664125531b8"
    );

    // Ed25519 signatures are deterministic.
    let signature = keypair.sign(b"chainoldnew").unwrap();
    assert_eq!(
        hex::encode(signature.to_array()),
        "dd9e9051a082680b4e0eb5400d91e71847b0e8690b94681a629c08d80df8442f\
         8332ea831f89da9420f03a77fbc5d702d52ce2a62748a11cb034df3d89177c06"
    );
}

#[test]
fn test_serialization_roundtrip() {
    let keypair = Ed25519KeyPair::generate().unwrap();

    let public_bytes = keypair.public_key().to_bytes();
    let private_bytes = keypair.private_key().to_bytes();

    assert_eq!(public_bytes.len(), 32);
    assert_eq!(private_bytes.len(), 32); // Just the seed

    let public_key = Ed25519PublicKey::from_bytes(&public_bytes).unwrap();
    let private_key = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();

    // Verify we can derive the same public key from the loaded private key
    assert_eq!(public_key.to_bytes(), private_key.public_key().to_bytes());
}

#[test]
fn test_sign_verify_with_loaded_keys() {
    let original_keypair = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message for persistence";
    let original_sig = original_keypair.sign(message).unwrap();

    let private_bytes = original_keypair.private_key().to_bytes();
    let loaded_private = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();
    let reconstructed_keypair = Ed25519KeyPair::from_private_key(&loaded_private);

    let new_sig = reconstructed_keypair.sign(message).unwrap();
    assert_eq!(original_sig.to_bytes(), new_sig.to_bytes());
    assert!(original_keypair
        .public_key()
        .verify(message, &new_sig)
        .is_ok());
}

#[test]
fn test_wrong_signature_fails() {
    let keypair1 = Ed25519KeyPair::generate().unwrap();
    let keypair2 = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair1.sign(message).unwrap();
    assert!(matches!(
        keypair2.public_key().verify(message, &signature),
        Err(CryptoError::VerificationFailed)
    ));
}

#[test]
fn test_tampered_message_fails() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let signature = keypair.sign(b"Original message").unwrap();

    let public_key = keypair.public_key();
    assert!(public_key.verify(b"Original message", &signature).is_ok());
    assert!(public_key.verify(b"Tampered message", &signature).is_err());
}

#[test]
fn test_malformed_lengths_are_rejected() {
    assert!(matches!(
        Ed25519PublicKey::from_bytes(&[1u8; 31]),
        Err(CryptoError::InvalidKey(_))
    ));
    assert!(matches!(
        Ed25519PrivateKey::from_bytes(&[1u8; 33]),
        Err(CryptoError::InvalidKey(_))
    ));
    assert!(matches!(
        Ed25519Signature::from_bytes(&[0u8; 63]),
        Err(CryptoError::InvalidSignature(_))
    ));
}
