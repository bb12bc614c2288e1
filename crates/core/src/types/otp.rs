//! One-time password code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// Fewer or more than six characters were entered.
    #[error("OTP must be exactly 6 digits")]
    Incomplete,
    /// Six characters, but not all ASCII digits.
    #[error("OTP must contain only digits")]
    NonDigit,
}

/// A six digit verification code as typed by the user.
///
/// This only checks the shape of the code. Whether a code is accepted is
/// decided by [`crate::auth::OtpPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Parse a code, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Incomplete`] unless exactly six characters remain,
    /// and [`OtpError::NonDigit`] if any of them is not `0-9`.
    pub fn parse(s: &str) -> Result<Self, OtpError> {
        let trimmed = s.trim();
        if trimmed.chars().count() != Self::LENGTH {
            return Err(OtpError::Incomplete);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpError::NonDigit);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the code digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(OtpCode::parse("123456").is_ok());
        assert!(OtpCode::parse(" 000000 ").is_ok());
    }

    #[test]
    fn test_parse_incomplete() {
        assert_eq!(OtpCode::parse(""), Err(OtpError::Incomplete));
        assert_eq!(OtpCode::parse("12345"), Err(OtpError::Incomplete));
        assert_eq!(OtpCode::parse("1234567"), Err(OtpError::Incomplete));
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(OtpCode::parse("12a456"), Err(OtpError::NonDigit));
        assert_eq!(OtpCode::parse("12 456"), Err(OtpError::NonDigit));
    }
}
