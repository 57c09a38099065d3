//! Outer envelope and its hex text form
//!
//! The binary envelope (version 2) is:
//! - version: 1 byte (=2)
//! - salt: 8 bytes
//! - nonce: 12 bytes
//! - ciphertext: variable length (includes the 16-byte GCM tag)
//!
//! The text form is uppercase hex without delimiters. It is free of
//! whitespace and safe to embed in URLs and shell arguments.

use crate::error::{ErrorCategory, ErrorKind, Result, SunHexError};

/// Version byte of the envelope
pub const ENVELOPE_VERSION: u8 = 2;

/// Length of salt in bytes
pub const SALT_LEN: usize = 8;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of everything before the ciphertext
pub const HEADER_LEN: usize = 1 + SALT_LEN + NONCE_LEN;

/// An unpacked envelope, borrowing from the buffer it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub nonce: &'a [u8; NONCE_LEN],
    pub ciphertext: &'a [u8],
}

/// Lay out version, salt, nonce and ciphertext in wire order.
pub fn pack(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    output.push(ENVELOPE_VERSION);
    output.extend_from_slice(salt);
    output.extend_from_slice(nonce);
    output.extend_from_slice(ciphertext);
    output
}

/// Split an envelope into its parts.
///
/// Length is checked before the version byte, so any input of at least
/// [`HEADER_LEN`] bytes with a foreign version is reported as unsupported.
pub fn unpack(bytes: &[u8]) -> Result<Envelope<'_>> {
    if bytes.len() < HEADER_LEN {
        return Err(SunHexError::invalid_format(format!(
            "fragment is {} bytes; likely truncated (header alone is {})",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let version = bytes[0];
    if version != ENVELOPE_VERSION {
        return Err(SunHexError::new(
            ErrorCategory::User,
            ErrorKind::UnsupportedVersion,
            format!("incompatible fragment version {}", version),
        ));
    }

    let (salt, rest) = bytes[1..].split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
    let salt: &[u8; SALT_LEN] = salt.try_into().map_err(|e| {
        SunHexError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Internal,
            "failed to read salt",
            e,
        )
    })?;
    let nonce: &[u8; NONCE_LEN] = nonce.try_into().map_err(|e| {
        SunHexError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Internal,
            "failed to read nonce",
            e,
        )
    })?;

    Ok(Envelope {
        salt,
        nonce,
        ciphertext,
    })
}

/// Encode bytes as uppercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode hex text of either letter case.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| {
        SunHexError::with_source(
            ErrorCategory::User,
            ErrorKind::InvalidFormat,
            format!("fragment is not valid hex: {}", e),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [0x11; SALT_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    #[test]
    fn test_pack_layout() {
        let packed = pack(&SALT, &NONCE, &[0xaa, 0xbb]);

        assert_eq!(packed.len(), HEADER_LEN + 2);
        assert_eq!(packed[0], ENVELOPE_VERSION);
        assert_eq!(&packed[1..9], &SALT);
        assert_eq!(&packed[9..21], &NONCE);
        assert_eq!(&packed[21..], &[0xaa, 0xbb]);
    }

    #[test]
    fn test_unpack_borrows_parts() {
        let packed = pack(&SALT, &NONCE, b"sealed");
        let envelope = unpack(&packed).unwrap();

        assert_eq!(envelope.salt, &SALT);
        assert_eq!(envelope.nonce, &NONCE);
        assert_eq!(envelope.ciphertext, b"sealed");
    }

    #[test]
    fn test_unpack_empty_ciphertext() {
        let packed = pack(&SALT, &NONCE, &[]);
        let envelope = unpack(&packed).unwrap();
        assert!(envelope.ciphertext.is_empty());
    }

    #[test]
    fn test_truncated() {
        let packed = pack(&SALT, &NONCE, &[]);
        let err = unpack(&packed[..HEADER_LEN - 1]).expect_err("expected truncation");
        assert_eq!(err.kind, ErrorKind::InvalidFormat);

        let err = unpack(&[]).expect_err("expected truncation");
        assert_eq!(err.kind, ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_wrong_version() {
        for version in [0u8, 1, 3, 0xff] {
            let mut packed = pack(&SALT, &NONCE, b"sealed");
            packed[0] = version;
            let err = unpack(&packed).expect_err("expected version error");
            assert_eq!(err.kind, ErrorKind::UnsupportedVersion);
        }
    }

    #[test]
    fn test_hex_is_uppercase() {
        assert_eq!(to_hex(&[0x02, 0xab, 0xff, 0x00]), "02ABFF00");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_hex_accepts_either_case() {
        assert_eq!(from_hex("02abFF00").unwrap(), vec![0x02, 0xab, 0xff, 0x00]);
    }

    #[test]
    fn test_hex_odd_length() {
        let err = from_hex("02A").expect_err("expected odd length error");
        assert_eq!(err.kind, ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_hex_bad_characters() {
        for text in ["not-hex", "0G", "02 A", "ÿÿ"] {
            let err = from_hex(text).expect_err("expected invalid hex error");
            assert_eq!(err.kind, ErrorKind::InvalidFormat);
        }
    }

    #[test]
    fn test_all_byte_values() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = to_hex(&bytes);
        assert_eq!(text.len(), 512);
        assert!(text.starts_with("000102"));
        assert!(text.ends_with("FDFEFF"));
        assert_eq!(from_hex(&text).unwrap(), bytes);
    }
}
