//! Key derivation and authenticated encryption
//!
//! The standard provider uses:
//! - PBKDF2-HMAC-SHA256 (100 000 iterations) to derive a 32-byte key
//!   from a password and an 8-byte salt
//! - AES-256-GCM with a 12-byte nonce; the 16-byte tag is appended to
//!   the ciphertext

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::envelope::{NONCE_LEN, SALT_LEN};
use crate::error::{ErrorCategory, ErrorKind, Result, SunHexError};

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A derived symmetric key, wiped on drop.
pub type Key = Zeroizing<[u8; KEY_LEN]>;

/// Password-based key derivation plus authenticated encryption.
///
/// Implementations must be safe to share between threads; every call is
/// independent of every other.
pub trait CryptoProvider: Send + Sync {
    /// Derive a key. Must be deterministic in `(password, salt)`.
    fn derive_key(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Key>;

    /// Encrypt under a caller-chosen nonce.
    ///
    /// A nonce must never be used twice with the same key; outside of tests
    /// go through [`CryptoProvider::encrypt`].
    fn seal(&self, plaintext: &[u8], key: &Key, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>>;

    /// Decrypt and verify. Any mismatch of key, nonce or ciphertext yields
    /// an `AuthenticationFailure`.
    fn decrypt(&self, ciphertext: &[u8], key: &Key, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>>;

    /// Encrypt under a fresh random nonce, returning the ciphertext and the nonce.
    fn encrypt(&self, plaintext: &[u8], key: &Key) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
        let nonce: [u8; NONCE_LEN] = random_bytes()?;
        let ciphertext = self.seal(plaintext, key, &nonce)?;
        Ok((ciphertext, nonce))
    }
}

/// PBKDF2-HMAC-SHA256 + AES-256-GCM.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCrypto;

impl StandardCrypto {
    pub fn new() -> Self {
        Self
    }

    fn cipher(key: &Key) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(key.as_slice()).map_err(|_| {
            SunHexError::new(
                ErrorCategory::Internal,
                ErrorKind::Internal,
                "failed to initialize cipher",
            )
        })
    }
}

impl CryptoProvider for StandardCrypto {
    fn derive_key(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Key> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, key.as_mut_slice());
        Ok(key)
    }

    fn seal(&self, plaintext: &[u8], key: &Key, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
        let cipher = Self::cipher(key)?;
        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| {
                SunHexError::new(
                    ErrorCategory::Internal,
                    ErrorKind::Internal,
                    "encryption failed",
                )
            })
    }

    fn decrypt(&self, ciphertext: &[u8], key: &Key, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
        let cipher = Self::cipher(key)?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SunHexError::authentication_failure())
    }
}

/// Fill an array from the operating system's CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        SunHexError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Internal,
            "secure random source failed",
            e,
        )
    })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [0x42; SALT_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x24; NONCE_LEN];

    fn key_from_hex(text: &str) -> Key {
        let bytes: [u8; KEY_LEN] = hex::decode(text).unwrap().try_into().unwrap();
        Zeroizing::new(bytes)
    }

    #[test]
    fn test_known_key() {
        let key = StandardCrypto.derive_key(b"1234", &SALT).unwrap();
        assert_eq!(
            hex::encode(*key),
            "7a384abda628c2f0aa9782fbd9b98f75d20dc26acc0d66c6ea280bfaa5e813fa"
        );
    }

    #[test]
    fn test_key_depends_on_password_and_salt() {
        let crypto = StandardCrypto::new();
        let base = crypto.derive_key(b"1234", &SALT).unwrap();
        let other_password = crypto.derive_key(b"1235", &SALT).unwrap();
        let other_salt = crypto.derive_key(b"1234", &[0x43; SALT_LEN]).unwrap();

        assert_ne!(*base, *other_password);
        assert_ne!(*base, *other_salt);
    }

    #[test]
    fn test_known_ciphertext() {
        let key = key_from_hex("7a384abda628c2f0aa9782fbd9b98f75d20dc26acc0d66c6ea280bfaa5e813fa");
        let sealed = StandardCrypto.seal(b"test payload", &key, &NONCE).unwrap();

        assert_eq!(
            hex::encode(&sealed),
            "151645ef471dea2fca9afc59998e52a6d7d3e56714aded3f4cdd264b"
        );
        assert_eq!(sealed.len(), b"test payload".len() + TAG_LEN);
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let (ciphertext, nonce) = StandardCrypto.encrypt(b"hello", &key).unwrap();
        let plaintext = StandardCrypto.decrypt(&ciphertext, &key, &nonce).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let (ct1, nonce1) = StandardCrypto.encrypt(b"hello", &key).unwrap();
        let (ct2, nonce2) = StandardCrypto.encrypt(b"hello", &key).unwrap();

        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_wrong_key() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let other = Zeroizing::new([8u8; KEY_LEN]);
        let sealed = StandardCrypto.seal(b"hello", &key, &NONCE).unwrap();

        let err = StandardCrypto
            .decrypt(&sealed, &other, &NONCE)
            .expect_err("expected authentication failure");
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_wrong_nonce() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let sealed = StandardCrypto.seal(b"hello", &key, &NONCE).unwrap();

        let err = StandardCrypto
            .decrypt(&sealed, &key, &[0x25; NONCE_LEN])
            .expect_err("expected authentication failure");
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_tampered_ciphertext() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let sealed = StandardCrypto.seal(b"hello", &key, &NONCE).unwrap();

        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            let err = StandardCrypto
                .decrypt(&tampered, &key, &NONCE)
                .expect_err("expected authentication failure");
            assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
        }
    }

    #[test]
    fn test_too_short_for_tag() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let err = StandardCrypto
            .decrypt(&[0u8; TAG_LEN - 1], &key, &NONCE)
            .expect_err("expected authentication failure");
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);

        let err = StandardCrypto
            .decrypt(&[], &key, &NONCE)
            .expect_err("expected authentication failure");
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_authentication_messages_identical() {
        let key = Zeroizing::new([7u8; KEY_LEN]);
        let other = Zeroizing::new([8u8; KEY_LEN]);
        let mut sealed = StandardCrypto.seal(b"hello", &key, &NONCE).unwrap();

        let wrong_key = StandardCrypto.decrypt(&sealed, &other, &NONCE).unwrap_err();
        sealed[0] ^= 0x80;
        let tampered = StandardCrypto.decrypt(&sealed, &key, &NONCE).unwrap_err();

        assert_eq!(wrong_key.to_string(), tampered.to_string());
    }

    #[test]
    fn test_random_bytes_differ() {
        let a: [u8; 16] = random_bytes().unwrap();
        let b: [u8; 16] = random_bytes().unwrap();
        assert_ne!(a, b);
    }
}
