//! Country code table
//!
//! Country codes are stored inside fragments as a 16-bit position in an
//! ordered table. The position is the only thing persisted, so the table
//! must never be reordered once fragments exist; new codes may only be
//! appended.

/// Placeholder returned when a fragment names an index past the end of the table.
pub const UNKNOWN_CODE: &str = "??";

/// ISO 3166-1 alpha-2 codes, ascending. Frozen: append only.
const ISO_3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR",
    "AS", "AT", "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE",
    "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD",
    "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN", "CO", "CR",
    "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI",
    "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU",
    "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT",
    "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK",
    "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME",
    "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU",
    "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS",
    "RU", "RW", "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI",
    "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK",
    "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW", "TZ", "UA",
    "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// An immutable ordered list of two-letter codes, addressable both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryTable {
    codes: &'static [&'static str],
}

impl CountryTable {
    /// Wraps a caller-supplied table.
    ///
    /// Codes are expected in uppercase. The table must fit a 16-bit index;
    /// entries past position 65535 are unreachable.
    pub const fn new(codes: &'static [&'static str]) -> Self {
        Self { codes }
    }

    /// The built-in ISO 3166-1 alpha-2 table.
    pub const fn iso3166() -> Self {
        Self::new(ISO_3166_ALPHA2)
    }

    /// Position of `code` in the table, ignoring ASCII case.
    pub fn index_of(&self, code: &str) -> Option<u16> {
        self.codes
            .iter()
            .position(|c| c.eq_ignore_ascii_case(code))
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Code stored at `index`, if any.
    pub fn code_at(&self, index: u16) -> Option<&'static str> {
        self.codes.get(usize::from(index)).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &'static [&'static str] {
        self.codes
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::iso3166()
    }
}
