//! Mock phone/OTP login rules.
//!
//! There is no identity provider behind Naqlah yet. A visitor enters a Saudi
//! mobile number, receives (pretend) SMS code, and is logged in once the code
//! passes the configured [`OtpPolicy`]. Numbers ending in `000` are treated as
//! unregistered and sent to profile completion first.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Email, OtpCode, SaudiPhone};

/// Suffix marking a phone number as not yet registered.
pub const NEW_USER_SUFFIX: &str = "000";

/// Display name given to an existing customer by the mock login.
pub const MOCK_CUSTOMER_NAME: &str = "محمد أحمد";

/// Display name given to an existing company by the mock login.
pub const MOCK_COMPANY_NAME: &str = "شركة النقل";

/// Which login tab the visitor used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Customer,
    Company,
}

impl AccountType {
    /// Parse the tab value posted by the login form. Unknown values fall back
    /// to [`AccountType::Customer`].
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("company") => Self::Company,
            _ => Self::Customer,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Company => "company",
        }
    }

    #[must_use]
    pub const fn is_company(self) -> bool {
        matches!(self, Self::Company)
    }
}

/// A logged-in (mock) user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Empty until the profile has been completed.
    pub name: String,
    pub phone: SaudiPhone,
    pub email: Option<Email>,
    pub is_company: bool,
}

impl User {
    /// Whether the user still has to fill in the profile page.
    #[must_use]
    pub fn needs_profile(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// First letter of the name for the avatar badge.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default()
    }
}

/// Which verification codes the mock verifier accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpPolicy {
    /// Any well-formed six digit code.
    AnyCode,
    /// Only the listed codes.
    FixedCodes(Vec<String>),
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::FixedCodes(vec!["123456".to_owned(), "000000".to_owned()])
    }
}

impl OtpPolicy {
    /// Check a well-formed code against the policy.
    #[must_use]
    pub fn accepts(&self, code: &OtpCode) -> bool {
        match self {
            Self::AnyCode => true,
            Self::FixedCodes(codes) => codes.iter().any(|c| c == code.as_str()),
        }
    }
}

/// Result of a successful OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Known number: logged in, continue to the dashboard.
    Existing(User),
    /// Unknown number: logged in with an empty name, complete the profile.
    NewUser(User),
}

impl LoginOutcome {
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Existing(user) | Self::NewUser(user) => user,
        }
    }

    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Existing(user) | Self::NewUser(user) => user,
        }
    }
}

/// Build the mock user for a verified phone number.
#[must_use]
pub fn resolve_login(phone: SaudiPhone, account_type: AccountType) -> LoginOutcome {
    if phone.as_str().ends_with(NEW_USER_SUFFIX) {
        return LoginOutcome::NewUser(User {
            id: Uuid::new_v4(),
            name: String::new(),
            phone,
            email: None,
            is_company: account_type.is_company(),
        });
    }

    let name = if account_type.is_company() {
        MOCK_COMPANY_NAME
    } else {
        MOCK_CUSTOMER_NAME
    };

    LoginOutcome::Existing(User {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        phone,
        email: None,
        is_company: account_type.is_company(),
    })
}
