//! Core types for Naqlah.
//!
//! This module provides type-safe wrappers for the values users type into
//! forms.

pub mod attachment;
pub mod email;
pub mod locale;
pub mod otp;
pub mod phone;

pub use attachment::Attachment;
pub use email::{Email, EmailError};
pub use locale::{Locale, LocaleError};
pub use otp::{OtpCode, OtpError};
pub use phone::{PhoneError, SaudiPhone};
