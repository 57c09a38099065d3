//! SunHex - password-protected personal data fragments
//!
//! A small personal record is packed into a compact binary layout,
//! encrypted with a key derived from a password, wrapped in a versioned
//! envelope with its salt and nonce, and rendered as uppercase hex. The
//! resulting fragment resolves back to the record offline, given the
//! password.
//!
//! ```no_run
//! use sunhex::{Gender, PersonalRecord, SunHex};
//!
//! let sunhex = SunHex::default();
//! let record = PersonalRecord {
//!     first_name: "Abdelhakim".to_string(),
//!     last_name: "Sahifa".to_string(),
//!     country_code: "MA".to_string(),
//!     birth_year: 2000,
//!     birth_month: 1,
//!     birth_day: 1,
//!     gender: Some(Gender::Male),
//! };
//! let fragment = sunhex.crystallize(&record, "1234")?;
//! assert_eq!(sunhex.resolve(&fragment, "1234")?, record);
//! # Ok::<(), sunhex::SunHexError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod country;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fragment;
pub mod record;

pub use config::{CountryPolicy, SunHexConfig};
pub use country::CountryTable;
pub use crypto::{CryptoProvider, StandardCrypto};
pub use error::{ErrorCategory, ErrorKind, Result, SunHexError};
pub use fragment::{FragmentInfo, SunHex};
pub use record::{Gender, PersonalRecord};
