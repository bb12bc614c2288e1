//! Moving-company registration form.

use serde::{Deserialize, Serialize};

use super::{FieldErrors, password_problem, require_min};
use crate::types::{Attachment, Email, Locale};

/// Cities a company can register in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Jeddah,
    Riyadh,
    Dammam,
    Mecca,
    Medina,
    Khobar,
    Tabuk,
    Abha,
}

impl City {
    pub const ALL: [Self; 8] = [
        Self::Jeddah,
        Self::Riyadh,
        Self::Dammam,
        Self::Mecca,
        Self::Medina,
        Self::Khobar,
        Self::Tabuk,
        Self::Abha,
    ];

    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jeddah => "jeddah",
            Self::Riyadh => "riyadh",
            Self::Dammam => "dammam",
            Self::Mecca => "mecca",
            Self::Medina => "medina",
            Self::Khobar => "khobar",
            Self::Tabuk => "tabuk",
            Self::Abha => "abha",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ar => match self {
                Self::Jeddah => "جدة",
                Self::Riyadh => "الرياض",
                Self::Dammam => "الدمام",
                Self::Mecca => "مكة المكرمة",
                Self::Medina => "المدينة المنورة",
                Self::Khobar => "الخبر",
                Self::Tabuk => "تبوك",
                Self::Abha => "أبها",
            },
            Locale::En => match self {
                Self::Jeddah => "Jeddah",
                Self::Riyadh => "Riyadh",
                Self::Dammam => "Dammam",
                Self::Mecca => "Mecca",
                Self::Medina => "Medina",
                Self::Khobar => "Khobar",
                Self::Tabuk => "Tabuk",
                Self::Abha => "Abha",
            },
        }
    }
}

/// Services a company can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyService {
    Disassembly,
    Packing,
    Insurance,
    Cleaning,
    Moving,
}

impl CompanyService {
    pub const ALL: [Self; 5] = [
        Self::Disassembly,
        Self::Packing,
        Self::Insurance,
        Self::Cleaning,
        Self::Moving,
    ];

    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disassembly => "disassembly",
            Self::Packing => "packing",
            Self::Insurance => "insurance",
            Self::Cleaning => "cleaning",
            Self::Moving => "moving",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Disassembly, Locale::Ar) => "الفك والتركيب",
            (Self::Disassembly, Locale::En) => "Disassembly and assembly",
            (Self::Packing, Locale::Ar) => "التغليف",
            (Self::Packing, Locale::En) => "Packing",
            (Self::Insurance, Locale::Ar) => "التأمين",
            (Self::Insurance, Locale::En) => "Insurance",
            (Self::Cleaning, Locale::Ar) => "التنظيف",
            (Self::Cleaning, Locale::En) => "Cleaning",
            (Self::Moving, Locale::Ar) => "النقل",
            (Self::Moving, Locale::En) => "Moving",
        }
    }
}

/// Registration form as collected from the multipart upload.
#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub logo: Option<Attachment>,
    pub company_name: String,
    pub covenant: String,
    pub commercial_registration: Option<Attachment>,
    pub city: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub secret_code: String,
    /// Raw service ids, one per ticked checkbox.
    pub services: Vec<String>,
    pub about: String,
    pub agree_terms: bool,
}

/// A validated registration. The password is checked and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyRegistration {
    pub logo: Option<Attachment>,
    pub company_name: String,
    pub covenant: String,
    pub commercial_registration: Option<Attachment>,
    pub city: City,
    pub email: Email,
    pub services: Vec<CompanyService>,
    pub about: String,
}

impl CompanyForm {
    /// # Errors
    ///
    /// Returns the first problem for every failing field.
    pub fn validate(&self) -> Result<CompanyRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(logo) = &self.logo {
            if !logo.is_image() {
                errors.add("logo", "Logo must be an image");
            } else if logo.size > Attachment::MAX_SIZE {
                errors.add("logo", "File is too large");
            }
        }

        let company_name = require_min(
            &mut errors,
            "company_name",
            &self.company_name,
            2,
            "Company name must be at least 2 characters",
        );

        if self
            .commercial_registration
            .as_ref()
            .is_some_and(|f| f.size > Attachment::MAX_SIZE)
        {
            errors.add("commercial_registration", "File is too large");
        }

        let city = City::from_form(&self.city);
        if city.is_none() {
            errors.add("city", "Please select a city");
        }

        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        if let Some(problem) = password_problem(&self.password) {
            errors.add("password", problem);
        }
        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }

        let mut services = Vec::new();
        for raw in &self.services {
            match CompanyService::from_form(raw) {
                Some(service) if !services.contains(&service) => services.push(service),
                Some(_) => {}
                None => errors.add("services", "Unknown service"),
            }
        }
        if services.is_empty() {
            errors.add("services", "Please select at least one service");
        }

        let about = require_min(
            &mut errors,
            "about",
            &self.about,
            10,
            "About company must be at least 10 characters",
        );

        if !self.agree_terms {
            errors.add("agree_terms", "You must agree to the terms and conditions");
        }

        match (city, email) {
            (Some(city), Some(email)) if errors.is_empty() => Ok(CompanyRegistration {
                logo: self.logo.clone(),
                company_name,
                covenant: self.covenant.trim().to_owned(),
                commercial_registration: self.commercial_registration.clone(),
                city,
                email,
                services,
                about,
            }),
            _ => Err(errors),
        }
    }
}
