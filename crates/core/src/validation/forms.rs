//! Login, OTP, profile, contact and newsletter forms.

use serde::Deserialize;

use super::{FieldErrors, is_checked, require_min};
use crate::auth::AccountType;
use crate::types::{Email, OtpCode, SaudiPhone};

// =============================================================================
// Login
// =============================================================================

/// Phone step of the login flow, as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub save_data: Option<String>,
}

/// A phone number ready to receive an OTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub phone: SaudiPhone,
    pub account_type: AccountType,
    pub save_data: bool,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns a `phone` field error if the number is not a Saudi mobile.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let phone = SaudiPhone::parse(&self.phone).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.add("phone", e.to_string());
            errors
        })?;
        Ok(LoginRequest {
            phone,
            account_type: AccountType::from_form(self.account_type.as_deref()),
            save_data: is_checked(self.save_data.as_deref()),
        })
    }
}

/// OTP step of the login flow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpForm {
    #[serde(default)]
    pub otp: String,
}

impl OtpForm {
    /// # Errors
    ///
    /// Returns an `otp` field error unless the code is exactly six digits.
    pub fn validate(&self) -> Result<OtpCode, FieldErrors> {
        OtpCode::parse(&self.otp).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.add("otp", e.to_string());
            errors
        })
    }
}

// =============================================================================
// Profile completion
// =============================================================================

/// Profile page shown to users logging in for the first time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub agree_terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: SaudiPhone,
    pub email: Option<Email>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns field errors for missing names, a bad phone, a malformed
    /// optional email, or unticked terms.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim().to_owned();
        if first_name.is_empty() {
            errors.add("first_name", "First name is required");
        }
        let last_name = self.last_name.trim().to_owned();
        if last_name.is_empty() {
            errors.add("last_name", "Last name is required");
        }

        let phone = SaudiPhone::parse(&self.phone)
            .map_err(|e| errors.add("phone", e.to_string()))
            .ok();

        let email = if self.email.trim().is_empty() {
            None
        } else {
            Email::parse(&self.email)
                .map_err(|e| errors.add("email", e.to_string()))
                .ok()
        };

        if !is_checked(self.agree_terms.as_deref()) {
            errors.add("agree_terms", "You must agree to the terms and conditions");
        }

        match phone {
            Some(phone) if errors.is_empty() => Ok(ProfileUpdate {
                first_name,
                last_name,
                phone,
                email,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Marketing forms
// =============================================================================

/// Contact section on the home page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: SaudiPhone,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns the first problem for each of name (2+), email, phone,
    /// subject (3+) and message (10+).
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = require_min(
            &mut errors,
            "name",
            &self.name,
            2,
            "Name must be at least 2 characters",
        );
        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();
        let phone = SaudiPhone::parse(&self.phone)
            .map_err(|e| errors.add("phone", e.to_string()))
            .ok();
        let subject = require_min(
            &mut errors,
            "subject",
            &self.subject,
            3,
            "Subject must be at least 3 characters",
        );
        let message = require_min(
            &mut errors,
            "message",
            &self.message,
            10,
            "Message must be at least 10 characters",
        );

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(ContactMessage {
                name,
                email,
                phone,
                subject,
                message,
            }),
            _ => Err(errors),
        }
    }
}

/// Newsletter signup in the footer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub email: String,
}

impl NewsletterForm {
    /// # Errors
    ///
    /// Returns an `email` field error for a missing or malformed address.
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        Email::parse(&self.email).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.add("email", e.to_string());
            errors
        })
    }
}
