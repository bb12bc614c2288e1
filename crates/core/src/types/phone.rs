//! Saudi mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SaudiPhone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Nothing was entered.
    #[error("Phone number is required")]
    Empty,
    /// The number is not nine characters long.
    #[error("Phone number must be exactly 9 digits")]
    WrongLength,
    /// The number contains something other than ASCII digits.
    #[error("Phone number must contain only digits")]
    NonDigit,
    /// Saudi mobile numbers start with 5.
    #[error("Phone number must start with 5")]
    InvalidStart,
}

/// A Saudi mobile number without the `+966` country prefix.
///
/// Matches `^5[0-9]{8}$` after removing whitespace, e.g. `591002006`.
///
/// ```
/// use naqlah_core::SaudiPhone;
///
/// let phone = SaudiPhone::parse("59 100 2006").unwrap();
/// assert_eq!(phone.as_str(), "591002006");
/// assert_eq!(phone.international(), "+966591002006");
///
/// assert!(SaudiPhone::parse("491002006").is_err());
/// assert!(SaudiPhone::parse("5910020").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SaudiPhone(String);

impl SaudiPhone {
    /// Number of digits in a local Saudi mobile number.
    pub const LENGTH: usize = 9;

    /// International dialling prefix shown next to the input.
    pub const COUNTRY_PREFIX: &'static str = "+966";

    /// Parse a phone number from user input.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks: empty, wrong length,
    /// non-digit characters, or not starting with 5.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        if cleaned.chars().count() != Self::LENGTH {
            return Err(PhoneError::WrongLength);
        }

        if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if !cleaned.starts_with('5') {
            return Err(PhoneError::InvalidStart);
        }

        Ok(Self(cleaned))
    }

    /// Returns the nine local digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number with the `+966` prefix.
    #[must_use]
    pub fn international(&self) -> String {
        format!("{}{}", Self::COUNTRY_PREFIX, self.0)
    }
}

impl fmt::Display for SaudiPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SaudiPhone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(SaudiPhone::parse("591002006").unwrap().as_str(), "591002006");
        assert_eq!(SaudiPhone::parse(" 5 9100 2006 ").unwrap().as_str(), "591002006");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SaudiPhone::parse(""), Err(PhoneError::Empty));
        assert_eq!(SaudiPhone::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(SaudiPhone::parse("59100200"), Err(PhoneError::WrongLength));
        assert_eq!(SaudiPhone::parse("5910020061"), Err(PhoneError::WrongLength));
        assert_eq!(SaudiPhone::parse("+966591002006"), Err(PhoneError::WrongLength));
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(SaudiPhone::parse("59100200a"), Err(PhoneError::NonDigit));
        assert_eq!(SaudiPhone::parse("5910-2006"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_parse_must_start_with_five() {
        assert_eq!(SaudiPhone::parse("491002006"), Err(PhoneError::InvalidStart));
        assert_eq!(SaudiPhone::parse("059100200"), Err(PhoneError::InvalidStart));
    }

    #[test]
    fn test_arabic_indic_digits_are_rejected() {
        assert_eq!(SaudiPhone::parse("٥٩١٠٠٢٠٠٦"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_international() {
        let phone = SaudiPhone::parse("512345678").unwrap();
        assert_eq!(phone.international(), "+966512345678");
    }
}
