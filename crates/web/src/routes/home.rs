//! Marketing home page, contact form and newsletter signup.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use naqlah_core::validation::{CompanyService, ContactForm, FieldErrors, NewsletterForm};
use tracing::instrument;

use crate::filters;
use crate::middleware::Page;

/// Partner companies shown on the home page.
const PARTNERS: [&str; 4] = [
    "شركة النقل السريع",
    "مؤسسة الأمان للنقل",
    "نقل الخليج",
    "الرواد لنقل الأثاث",
];

/// A service card.
#[derive(Clone)]
pub struct ServiceCard {
    pub id: &'static str,
    pub label: &'static str,
}

/// Contact section state.
#[derive(Default)]
pub struct ContactView {
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub sent: bool,
}

/// Newsletter section state.
#[derive(Default)]
pub struct NewsletterView {
    pub email: String,
    pub errors: FieldErrors,
    pub subscribed: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: Page,
    pub services: Vec<ServiceCard>,
    pub partners: &'static [&'static str],
    pub contact: ContactView,
    pub newsletter: NewsletterView,
}

impl HomeTemplate {
    fn new(page: Page) -> Self {
        let services = CompanyService::ALL
            .into_iter()
            .map(|s| ServiceCard {
                id: s.as_str(),
                label: s.label(page.locale),
            })
            .collect();

        Self {
            page,
            services,
            partners: &PARTNERS,
            contact: ContactView::default(),
            newsletter: NewsletterView::default(),
        }
    }
}

/// Display the home page.
pub async fn home(page: Page) -> impl IntoResponse {
    HomeTemplate::new(page)
}

/// Handle the contact form.
///
/// There is no inbox behind it: a valid message is logged and acknowledged.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn contact(page: Page, Form(form): Form<ContactForm>) -> Response {
    let mut template = HomeTemplate::new(page);

    match form.validate() {
        Ok(message) => {
            tracing::info!(
                name = %message.name,
                email = %message.email,
                phone = %message.phone,
                subject = %message.subject,
                "Contact message received"
            );
            template.contact.sent = true;
            template.into_response()
        }
        Err(errors) => {
            template.contact = ContactView {
                form,
                errors,
                sent: false,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
        }
    }
}

/// Handle the newsletter signup.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn newsletter(page: Page, Form(form): Form<NewsletterForm>) -> Response {
    let mut template = HomeTemplate::new(page);

    match form.validate() {
        Ok(email) => {
            tracing::info!(email = %email, "Newsletter subscription");
            template.newsletter.subscribed = true;
            template.into_response()
        }
        Err(errors) => {
            template.newsletter = NewsletterView {
                email: form.email,
                errors,
                subscribed: false,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
        }
    }
}
