//! Facade configuration

use serde::{Deserialize, Serialize};

/// What to do with a country code that is not in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryPolicy {
    /// Encode the code as table index 0. Lossy: the fragment resolves to
    /// whatever code occupies index 0.
    #[default]
    Fallback,
    /// Refuse to encode with an `UnknownCountry` error.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SunHexConfig {
    pub country_policy: CountryPolicy,
}

impl SunHexConfig {
    /// Configuration that rejects unrecognized country codes.
    pub fn strict() -> Self {
        Self {
            country_policy: CountryPolicy::Strict,
        }
    }
}
