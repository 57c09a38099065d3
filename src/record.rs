//! Personal record and its compact inner layout
//!
//! The inner layout (version 1) is:
//! - version: 1 byte (=1)
//! - gender code: 1 byte
//! - country index: 2 bytes (big-endian u16)
//! - day offset since 1900-01-01: 2 bytes (big-endian u16)
//! - name length N: 1 byte
//! - name: N bytes of UTF-8, `first_name + " " + last_name`

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::CountryPolicy;
use crate::country::{CountryTable, UNKNOWN_CODE};
use crate::error::{ErrorCategory, ErrorKind, Result, SunHexError};

/// Version byte of the inner record
pub const RECORD_VERSION: u8 = 1;

/// Length of the fixed part of the inner record
pub const RECORD_HEADER_LEN: usize = 7;

/// Largest full name, in UTF-8 bytes, that the length byte can describe
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// `NaiveDate::num_days_from_ce` of 1900-01-01, the day-offset epoch
const EPOCH_DAYS_FROM_CE: i32 = 693_596;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Wire code of this gender.
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Other => 3,
        }
    }

    /// Inverse of [`Gender::code`]. Unassigned codes, including the 0
    /// written for an absent gender, read back as `Other`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Gender::Male,
            2 => Gender::Female,
            _ => Gender::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub first_name: String,
    pub last_name: String,
    /// Two-letter country code; matched case-insensitively on encode.
    pub country_code: String,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    /// `None` is encoded as code 0 and resolves to `Some(Gender::Other)`.
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Pack a record into the inner layout.
pub fn pack(
    record: &PersonalRecord,
    table: &CountryTable,
    policy: CountryPolicy,
) -> Result<Vec<u8>> {
    let full_name = format!("{} {}", record.first_name, record.last_name);
    let name_bytes = full_name.as_bytes();
    let name_len = u8::try_from(name_bytes.len()).map_err(|_| {
        SunHexError::new(
            ErrorCategory::User,
            ErrorKind::EncodingOverflow,
            format!(
                "full name is {} bytes of UTF-8; at most {} can be encoded",
                name_bytes.len(),
                MAX_NAME_LEN
            ),
        )
    })?;

    let day_offset = day_offset(record.birth_year, record.birth_month, record.birth_day)?;
    let country_index = country_index(&record.country_code, table, policy)?;
    let gender = record.gender.map_or(0, Gender::code);

    let mut output = Vec::with_capacity(RECORD_HEADER_LEN + name_bytes.len());
    output.push(RECORD_VERSION);
    output.push(gender);
    output.extend_from_slice(&country_index.to_be_bytes());
    output.extend_from_slice(&day_offset.to_be_bytes());
    output.push(name_len);
    output.extend_from_slice(name_bytes);

    Ok(output)
}

/// Unpack a record from the inner layout.
pub fn unpack(bytes: &[u8], table: &CountryTable) -> Result<PersonalRecord> {
    if bytes.len() < RECORD_HEADER_LEN {
        return Err(SunHexError::invalid_format(
            "record likely truncated while reading header",
        ));
    }

    let version = bytes[0];
    if version != RECORD_VERSION {
        return Err(SunHexError::new(
            ErrorCategory::User,
            ErrorKind::UnsupportedVersion,
            format!("unsupported record version {}", version),
        ));
    }

    let gender = Gender::from_code(bytes[1]);
    let country_index = u16::from_be_bytes([bytes[2], bytes[3]]);
    let day_offset = u16::from_be_bytes([bytes[4], bytes[5]]);
    let name_end = RECORD_HEADER_LEN + usize::from(bytes[6]);

    if bytes.len() < name_end {
        return Err(SunHexError::invalid_format(
            "record likely truncated while reading name",
        ));
    }
    if bytes.len() > name_end {
        return Err(SunHexError::invalid_format(
            "invalid record: unexpected data after name",
        ));
    }

    let full_name = std::str::from_utf8(&bytes[RECORD_HEADER_LEN..name_end]).map_err(|e| {
        SunHexError::with_source(
            ErrorCategory::User,
            ErrorKind::InvalidFormat,
            "name is not valid UTF-8",
            e,
        )
    })?;
    let (first_name, last_name) = full_name.split_once(' ').unwrap_or((full_name, ""));

    let country_code = table.code_at(country_index).unwrap_or(UNKNOWN_CODE);
    let birth_date = date_from_offset(day_offset)?;

    Ok(PersonalRecord {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        country_code: country_code.to_string(),
        birth_year: birth_date.year(),
        birth_month: birth_date.month(),
        birth_day: birth_date.day(),
        gender: Some(gender),
    })
}

/// Whole days from 1900-01-01 to the given date.
fn day_offset(year: i32, month: u32, day: u32) -> Result<u16> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SunHexError::new(
            ErrorCategory::User,
            ErrorKind::InvalidDate,
            format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
        )
    })?;

    let days = date.num_days_from_ce() - EPOCH_DAYS_FROM_CE;
    u16::try_from(days).map_err(|_| {
        SunHexError::new(
            ErrorCategory::User,
            ErrorKind::EncodingOverflow,
            format!(
                "birth date {} outside the encodable range 1900-01-01 to 2079-06-06",
                date
            ),
        )
    })
}

fn date_from_offset(day_offset: u16) -> Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE + i32::from(day_offset)).ok_or_else(
        || {
            SunHexError::new(
                ErrorCategory::Internal,
                ErrorKind::Internal,
                format!("day offset {} outside the calendar", day_offset),
            )
        },
    )
}

fn country_index(code: &str, table: &CountryTable, policy: CountryPolicy) -> Result<u16> {
    match (table.index_of(code), policy) {
        (Some(index), _) => Ok(index),
        (None, CountryPolicy::Fallback) => {
            tracing::warn!("unrecognized country code, encoding as table index 0");
            Ok(0)
        }
        (None, CountryPolicy::Strict) => Err(SunHexError::new(
            ErrorCategory::User,
            ErrorKind::UnknownCountry,
            format!("country code {:?} is not in the country table", code),
        )),
    }
}
