//! Moving-company onboarding.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use naqlah_core::validation::{City, CompanyForm, CompanyService, FieldErrors, is_checked};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Page;

use super::SelectOption;
use super::form_data::FormData;

/// Registration form template.
#[derive(Template, WebTemplate)]
#[template(path = "company/register.html")]
pub struct RegisterTemplate {
    pub page: Page,
    pub form: CompanyForm,
    pub cities: Vec<SelectOption>,
    pub services: Vec<SelectOption>,
    pub errors: FieldErrors,
}

impl RegisterTemplate {
    fn new(page: Page, mut form: CompanyForm, errors: FieldErrors) -> Self {
        // Never echo passwords back into the page
        form.password.clear();
        form.confirm_password.clear();

        let locale = page.locale;
        let cities = City::ALL
            .into_iter()
            .map(|c| SelectOption::new(c.as_str(), c.label(locale), form.city == c.as_str()))
            .collect();
        let services = CompanyService::ALL
            .into_iter()
            .map(|s| {
                let checked = form.services.iter().any(|v| v == s.as_str());
                SelectOption::new(s.as_str(), s.label(locale), checked)
            })
            .collect();

        Self {
            page,
            form,
            cities,
            services,
            errors,
        }
    }
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "company/registered.html")]
pub struct RegisteredTemplate {
    pub page: Page,
    pub company_name: String,
    pub email: String,
}

/// Display the registration form.
pub async fn register_page(page: Page) -> impl IntoResponse {
    RegisterTemplate::new(page, CompanyForm::default(), FieldErrors::new())
}

fn company_form(data: &FormData) -> CompanyForm {
    CompanyForm {
        logo: data.file("logo"),
        company_name: data.text("company_name").to_owned(),
        covenant: data.text("covenant").to_owned(),
        commercial_registration: data.file("commercial_registration"),
        city: data.text("city").to_owned(),
        email: data.text("email").to_owned(),
        password: data.text("password").to_owned(),
        confirm_password: data.text("confirm_password").to_owned(),
        secret_code: data.text("secret_code").to_owned(),
        services: data.all("services").into_iter().map(str::to_owned).collect(),
        about: data.text("about").to_owned(),
        agree_terms: is_checked(data.opt("agree_terms")),
    }
}

/// Validate and "submit" a registration. Only file metadata is kept.
#[instrument(skip_all)]
pub async fn register(page: Page, multipart: Multipart) -> Result<Response> {
    let form = company_form(&FormData::read(multipart).await?);

    match form.validate() {
        Ok(registration) => {
            tracing::info!(
                registration = %serde_json::to_string(&registration).unwrap_or_default(),
                "Company registration submitted"
            );
            Ok(RegisteredTemplate {
                page,
                company_name: registration.company_name,
                email: registration.email.into_inner(),
            }
            .into_response())
        }
        Err(errors) => {
            tracing::debug!(fields = errors.len(), "Company registration rejected");
            let template = RegisterTemplate::new(page, form, errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_form_from_multipart_fields() {
        let mut data = FormData::default();
        data.push_text("company_name", " نقل الخليج ");
        data.push_text("services", "moving");
        data.push_text("services", "packing");
        data.push_text("agree_terms", "on");

        let form = company_form(&data);
        assert_eq!(form.company_name, "نقل الخليج");
        assert_eq!(form.services, vec!["moving", "packing"]);
        assert!(form.agree_terms);
        assert!(form.logo.is_none());
    }
}
