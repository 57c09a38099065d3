use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee that the caller did nothing
    /// wrong - merely that it cannot be confidently determined by the code.
    Internal,

    /// The caller provided invalid input, a wrong password, or data that
    /// was tampered with.
    User,
}

/// Fine-grained condition tags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The envelope or inner record carries a version byte we do not support.
    UnsupportedVersion,
    /// Malformed hex text, or a truncated or oversized binary layout.
    InvalidFormat,
    /// A field does not fit its wire representation (name longer than 255
    /// bytes, birth date outside the 16-bit day range).
    EncodingOverflow,
    /// Decryption failed the integrity check: wrong password, tampering,
    /// or corruption. These are deliberately not distinguished.
    AuthenticationFailure,
    /// The birth date components do not name a real calendar date.
    InvalidDate,
    /// The country code is absent from the table and strict mode is on.
    UnknownCountry,
    /// Unexpected failure of the random source or cipher.
    Internal,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct SunHexError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Specific condition tag.
    pub kind: ErrorKind,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl SunHexError {
    /// Creates a new error with a category, kind and display message.
    pub fn new(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The single error returned for every failed integrity check.
    ///
    /// Carries no source so that nothing about the cause leaks to callers.
    pub fn authentication_failure() -> Self {
        Self::new(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailure,
            "corrupt fragment, tampered-with data, or bad password",
        )
    }

    /// Shorthand for a caller-attributable malformed input.
    pub(crate) fn invalid_format(msg: impl Into<String>) -> Self {
        Self::new(ErrorCategory::User, ErrorKind::InvalidFormat, msg)
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SunHexError>;
