//! Form validation.
//!
//! Every form is posted as plain strings, checked here, and turned into a
//! typed value or a [`FieldErrors`] map holding the first message for each
//! failing field. Field errors are rendered inline next to the inputs; they
//! are never an HTTP-level error.

mod company;
mod forms;

pub use company::{City, CompanyForm, CompanyRegistration, CompanyService};
pub use forms::{
    ContactForm, ContactMessage, LoginForm, LoginRequest, NewsletterForm, OtpForm, ProfileForm,
    ProfileUpdate,
};

use serde::{Deserialize, Serialize};

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation messages keyed by field name, in the order they were found.
///
/// Only the first message per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a message unless the field already has one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if !self.has(&field) {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` if any message was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Shortest accepted password.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Characters that count as "special" in a password.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// First password rule `password` breaks, if any.
#[must_use]
pub fn password_problem(password: &str) -> Option<&'static str> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        Some("Password must be at least 8 characters long")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number")
    } else if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        Some("Password must contain at least one special character")
    } else {
        None
    }
}

/// Checkbox value as posted by a browser: present (usually `on`) when
/// ticked, absent otherwise.
#[must_use]
pub fn is_checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1" | "yes"))
}

/// Trim and require at least `min` characters.
pub(crate) fn require_min(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required");
    } else if trimmed.chars().count() < min {
        errors.add(field, message);
    }
    trimmed.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "first");
        errors.add("phone", "second");
        errors.add("email", "bad");
        assert_eq!(errors.get("phone"), Some("first"));
        assert_eq!(errors.len(), 2);
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        let mut errors = FieldErrors::new();
        errors.add("x", "y");
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_password_rules_in_order() {
        assert_eq!(
            password_problem("Ab1!"),
            Some("Password must be at least 8 characters long")
        );
        assert_eq!(
            password_problem("abcdefg1!"),
            Some("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            password_problem("ABCDEFG1!"),
            Some("Password must contain at least one lowercase letter")
        );
        assert_eq!(
            password_problem("Abcdefgh!"),
            Some("Password must contain at least one number")
        );
        assert_eq!(
            password_problem("Abcdefg12"),
            Some("Password must contain at least one special character")
        );
        assert_eq!(password_problem("Abcdef1?"), None);
    }

    #[test]
    fn test_is_checked() {
        assert!(is_checked(Some("on")));
        assert!(is_checked(Some("true")));
        assert!(!is_checked(Some("")));
        assert!(!is_checked(None));
    }

    #[test]
    fn test_require_min() {
        let mut errors = FieldErrors::new();
        let value = require_min(&mut errors, "name", "  a ", 2, "too short");
        assert_eq!(value, "a");
        assert_eq!(errors.get("name"), Some("too short"));

        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", "   ", 2, "too short");
        assert_eq!(errors.get("name"), Some("This field is required"));
    }
}
