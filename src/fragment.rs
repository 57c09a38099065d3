//! Fragment encoding and resolution
//!
//! Composes the record codec, the crypto provider and the envelope codec:
//!
//! record -> pack -> encrypt(derive_key(password, salt)) -> envelope -> hex
//!
//! and the reverse. Every call is self-contained; a `SunHex` holds only
//! immutable configuration and can be shared freely between threads.

use zeroize::Zeroizing;

use crate::config::SunHexConfig;
use crate::country::CountryTable;
use crate::crypto::{CryptoProvider, StandardCrypto, random_bytes};
use crate::envelope::{self, NONCE_LEN, SALT_LEN};
use crate::error::Result;
use crate::record::{self, PersonalRecord};

/// Non-secret facts about a fragment, readable without the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentInfo {
    pub version: u8,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext length including the authentication tag.
    pub ciphertext_len: usize,
}

#[derive(Debug, Clone)]
pub struct SunHex<P = StandardCrypto> {
    config: SunHexConfig,
    table: CountryTable,
    provider: P,
}

impl SunHex<StandardCrypto> {
    /// Build a facade with the built-in country table and standard crypto.
    pub fn new(config: SunHexConfig) -> Self {
        Self::with_parts(config, CountryTable::iso3166(), StandardCrypto::new())
    }
}

impl Default for SunHex<StandardCrypto> {
    fn default() -> Self {
        Self::new(SunHexConfig::default())
    }
}

impl<P: CryptoProvider> SunHex<P> {
    pub fn with_parts(config: SunHexConfig, table: CountryTable, provider: P) -> Self {
        Self {
            config,
            table,
            provider,
        }
    }

    pub fn config(&self) -> &SunHexConfig {
        &self.config
    }

    pub fn table(&self) -> &CountryTable {
        &self.table
    }

    /// Encode and encrypt a record into a fragment using fresh random salt and nonce.
    pub fn crystallize(
        &self,
        record: &PersonalRecord,
        password: impl AsRef<[u8]>,
    ) -> Result<String> {
        let plaintext = self.pack(record)?;
        let salt: [u8; SALT_LEN] = random_bytes()?;
        let key = self.provider.derive_key(password.as_ref(), &salt)?;
        let (ciphertext, nonce) = self.provider.encrypt(&plaintext, &key)?;

        Ok(self.finish(&salt, &nonce, &ciphertext))
    }

    /// Encode and encrypt a record using provided salt and nonce
    ///
    /// This function is ONLY for testing purposes to generate deterministic output.
    /// NEVER use this in production - always use `crystallize()` which generates
    /// random salt/nonce.
    pub fn crystallize_deterministic(
        &self,
        record: &PersonalRecord,
        password: impl AsRef<[u8]>,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<String> {
        let plaintext = self.pack(record)?;
        let key = self.provider.derive_key(password.as_ref(), salt)?;
        let ciphertext = self.provider.seal(&plaintext, &key, nonce)?;

        Ok(self.finish(salt, nonce, &ciphertext))
    }

    /// Decrypt and decode a fragment.
    ///
    /// A wrong password and a tampered fragment both fail with the same
    /// `AuthenticationFailure` error.
    pub fn resolve(&self, fragment: &str, password: impl AsRef<[u8]>) -> Result<PersonalRecord> {
        let bytes = envelope::from_hex(fragment)?;
        let sealed = envelope::unpack(&bytes)?;
        let key = self.provider.derive_key(password.as_ref(), sealed.salt)?;
        let plaintext = self
            .provider
            .decrypt(sealed.ciphertext, &key, sealed.nonce)
            .map(Zeroizing::new)?;
        let record = record::unpack(&plaintext, &self.table)
            .map_err(|e| e.with_context("failed to unpack record"))?;

        tracing::debug!(fragment_bytes = bytes.len(), "resolved fragment");
        Ok(record)
    }

    /// Read the envelope header of a fragment without decrypting it.
    pub fn inspect(&self, fragment: &str) -> Result<FragmentInfo> {
        let bytes = envelope::from_hex(fragment)?;
        let sealed = envelope::unpack(&bytes)?;

        Ok(FragmentInfo {
            version: bytes[0],
            salt: *sealed.salt,
            nonce: *sealed.nonce,
            ciphertext_len: sealed.ciphertext.len(),
        })
    }

    fn pack(&self, record: &PersonalRecord) -> Result<Zeroizing<Vec<u8>>> {
        record::pack(record, &self.table, self.config.country_policy)
            .map(Zeroizing::new)
            .map_err(|e| e.with_context("failed to pack record"))
    }

    fn finish(&self, salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> String {
        let sealed = envelope::pack(salt, nonce, ciphertext);
        tracing::debug!(fragment_bytes = sealed.len(), "crystallized fragment");
        envelope::to_hex(&sealed)
    }
}
