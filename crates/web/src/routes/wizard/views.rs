//! Page models for the wizard steps, review and processing pages.

use askama::Template;
use askama_web::WebTemplate;
use chrono::NaiveDate;
use naqlah_core::order::{
    AdditionalServices, DateTimeSelection, ElevatorSize, Flow, FurnitureDetails, FurnitureKind,
    Location, MoveTime, OrderFormData, Period, PlaceDetails, Step, StepUpdate, Wizard, YesNo,
};
use naqlah_core::validation::FieldErrors;
use naqlah_core::{Attachment, Locale};

use crate::filters;
use crate::geo::RouteSummary;
use crate::middleware::Page;
use crate::routes::SelectOption;

use super::parse::quantity_field;

/// Half-width of the map embed's bounding box, in degrees.
const MAP_SPAN: f64 = 0.01;

// =============================================================================
// Shared chrome
// =============================================================================

/// Header, progress bar and navigation shared by every step page.
#[derive(Debug, Clone)]
pub struct WizardChrome {
    pub base_path: &'static str,
    pub step_number: u8,
    pub total_steps: usize,
    /// Data steps show "step n of 7".
    pub counted: bool,
    pub progress: u8,
    pub title: &'static str,
    pub can_go_back: bool,
}

impl WizardChrome {
    #[must_use]
    pub fn new(flow: Flow, step: Step, locale: Locale) -> Self {
        Self {
            base_path: flow.base_path(),
            step_number: step.number(),
            total_steps: Step::DATA_STEPS.len(),
            counted: step.is_data_step(),
            progress: step.progress_percent(),
            title: step.title(locale),
            can_go_back: step != Step::PickupLocation && step != Step::Processing,
        }
    }
}

/// A yes/no question rendered as a radio pair.
#[derive(Debug, Clone)]
pub struct YesNoField {
    pub name: &'static str,
    pub label_key: &'static str,
    pub options: Vec<SelectOption>,
}

impl YesNoField {
    fn new(name: &'static str, label_key: &'static str, value: Option<YesNo>, locale: Locale) -> Self {
        let options = [YesNo::Yes, YesNo::No]
            .into_iter()
            .map(|v| SelectOption::new(v.as_str(), v.label(locale), value == Some(v)))
            .collect();
        Self {
            name,
            label_key,
            options,
        }
    }
}

// =============================================================================
// Steps 1 and 3
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "wizard/location.html")]
pub struct LocationTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub location: Location,
    /// Coordinate inputs stay empty until a place is chosen.
    pub lat: String,
    pub lng: String,
    pub map_url: String,
    pub query: String,
    pub errors: FieldErrors,
}

/// OpenStreetMap embed centred on a point, with a marker.
#[must_use]
pub fn map_embed_url(lat: f64, lng: f64) -> String {
    format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={:.5}%2C{:.5}%2C{:.5}%2C{:.5}&layer=mapnik&marker={lat:.5}%2C{lng:.5}",
        lng - MAP_SPAN,
        lat - MAP_SPAN,
        lng + MAP_SPAN,
        lat + MAP_SPAN,
    )
}

impl LocationTemplate {
    fn new(page: Page, chrome: WizardChrome, location: Location, query: String, errors: FieldErrors) -> Self {
        let (lat, lng) = if location.is_complete() {
            (format!("{:.6}", location.lat), format!("{:.6}", location.lng))
        } else {
            (String::new(), String::new())
        };
        Self {
            page,
            chrome,
            map_url: map_embed_url(location.lat, location.lng),
            location,
            lat,
            lng,
            query,
            errors,
        }
    }
}

// =============================================================================
// Steps 2 and 4
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "wizard/details.html")]
pub struct DetailsTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub details: PlaceDetails,
    pub floors: Vec<SelectOption>,
    pub elevator: YesNoField,
    pub elevator_sizes: Vec<SelectOption>,
    pub show_elevator_size: bool,
    pub errors: FieldErrors,
}

fn floor_label(floor: u8, page: &Page) -> String {
    if floor == 0 {
        page.t("wizard.ground_floor").to_owned()
    } else {
        floor.to_string()
    }
}

impl DetailsTemplate {
    fn new(page: Page, chrome: WizardChrome, details: PlaceDetails, errors: FieldErrors) -> Self {
        let locale = page.locale;
        let floors = (0..=PlaceDetails::MAX_FLOOR)
            .map(|f| SelectOption::new(f.to_string(), floor_label(f, &page), details.floor == Some(f)))
            .collect();
        let elevator_sizes = ElevatorSize::ALL
            .into_iter()
            .map(|s| SelectOption::new(s.as_str(), s.label(locale), details.elevator_size == Some(s)))
            .collect();

        Self {
            elevator: YesNoField::new("has_elevator", "wizard.has_elevator", details.has_elevator, locale),
            show_elevator_size: details.has_elevator.is_some_and(YesNo::is_yes),
            page,
            chrome,
            details,
            floors,
            elevator_sizes,
            errors,
        }
    }
}

// =============================================================================
// Step 5
// =============================================================================

/// One quantity input on the furniture step.
#[derive(Debug, Clone)]
pub struct FurnitureRow {
    pub field: String,
    pub label: &'static str,
    pub quantity: u32,
}

#[derive(Template, WebTemplate)]
#[template(path = "wizard/furniture.html")]
pub struct FurnitureTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub rooms: Vec<SelectOption>,
    pub items: Vec<FurnitureRow>,
    pub photos: Vec<Attachment>,
    pub errors: FieldErrors,
}

impl FurnitureTemplate {
    fn new(page: Page, chrome: WizardChrome, details: FurnitureDetails, errors: FieldErrors) -> Self {
        let rooms = (1..=FurnitureDetails::MAX_ROOMS)
            .map(|n| SelectOption::new(n.to_string(), n.to_string(), details.rooms_count == Some(n)))
            .collect();
        let items = FurnitureKind::ALL
            .into_iter()
            .map(|kind| FurnitureRow {
                field: quantity_field(kind),
                label: kind.label(page.locale),
                quantity: details.quantity_of(kind),
            })
            .collect();

        Self {
            page,
            chrome,
            rooms,
            items,
            photos: details.photos,
            errors,
        }
    }
}

// =============================================================================
// Step 6
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "wizard/services.html")]
pub struct ServicesTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub questions: Vec<YesNoField>,
    pub disassembly: YesNoField,
    pub disassembly_items: Vec<SelectOption>,
    pub disassembly_notes: String,
    pub show_disassembly: bool,
    pub errors: FieldErrors,
}

impl ServicesTemplate {
    fn new(page: Page, chrome: WizardChrome, services: AdditionalServices, errors: FieldErrors) -> Self {
        let locale = page.locale;
        let questions = vec![
            YesNoField::new("packaging", "wizard.packaging", services.packaging, locale),
            YesNoField::new("cleaning_before", "wizard.cleaning_before", services.cleaning_before, locale),
            YesNoField::new("cleaning_after", "wizard.cleaning_after", services.cleaning_after, locale),
            YesNoField::new("insurance", "wizard.insurance", services.insurance, locale),
        ];
        let disassembly_items = FurnitureKind::ALL
            .into_iter()
            .map(|k| SelectOption::new(k.as_str(), k.label(locale), services.disassembly_items.contains(&k)))
            .collect();

        Self {
            page,
            chrome,
            questions,
            disassembly: YesNoField::new(
                "need_disassembly",
                "wizard.need_disassembly",
                services.need_disassembly,
                locale,
            ),
            disassembly_items,
            show_disassembly: services.need_disassembly.is_some_and(YesNo::is_yes),
            disassembly_notes: services.disassembly_notes,
            errors,
        }
    }
}

// =============================================================================
// Step 7
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "wizard/date_time.html")]
pub struct DateTimeTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub date: String,
    pub min_date: String,
    pub hours: Vec<SelectOption>,
    pub minutes: Vec<SelectOption>,
    pub periods: Vec<SelectOption>,
    pub errors: FieldErrors,
}

impl DateTimeTemplate {
    fn new(
        page: Page,
        chrome: WizardChrome,
        selection: DateTimeSelection,
        today: NaiveDate,
        errors: FieldErrors,
    ) -> Self {
        let time = selection.time;
        let hours = (1..=12)
            .map(|h| SelectOption::new(h.to_string(), format!("{h:02}"), time.hour() == h))
            .collect();
        let minutes = MoveTime::MINUTES
            .into_iter()
            .map(|m| SelectOption::new(m.to_string(), format!("{m:02}"), time.minute() == m))
            .collect();
        let periods = [Period::Am, Period::Pm]
            .into_iter()
            .map(|p| SelectOption::new(p.as_str(), p.label(page.locale), selection.period == p))
            .collect();

        Self {
            page,
            chrome,
            date: selection.date.map(|d| d.to_string()).unwrap_or_default(),
            min_date: today.to_string(),
            hours,
            minutes,
            periods,
            errors,
        }
    }
}

// =============================================================================
// Review and processing
// =============================================================================

/// A label/value line on the review page.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

/// A block of the review page with an edit button for its first step.
#[derive(Debug, Clone)]
pub struct ReviewSection {
    pub title: &'static str,
    pub edit_step: u8,
    pub rows: Vec<ReviewRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "wizard/review.html")]
pub struct ReviewTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
    pub sections: Vec<ReviewSection>,
    pub route: RouteSummary,
}

fn or_none(value: &str, page: &Page) -> String {
    if value.trim().is_empty() {
        page.t("review.none").to_owned()
    } else {
        value.to_owned()
    }
}

fn place_rows(location: &Location, details: &PlaceDetails, page: &Page) -> Vec<ReviewRow> {
    let locale = page.locale;
    let elevator = match (details.has_elevator, details.elevator_size) {
        (Some(YesNo::Yes), Some(size)) => format!("{} ({})", YesNo::Yes.label(locale), size.label(locale)),
        (Some(answer), _) => answer.label(locale).to_owned(),
        (None, _) => page.t("review.none").to_owned(),
    };

    vec![
        ReviewRow {
            label: page.t("wizard.address"),
            value: or_none(&location.address, page),
        },
        ReviewRow {
            label: page.t("wizard.city"),
            value: or_none(&details.city, page),
        },
        ReviewRow {
            label: page.t("wizard.full_address"),
            value: or_none(&details.full_address, page),
        },
        ReviewRow {
            label: page.t("wizard.building_name"),
            value: or_none(&details.building_name, page),
        },
        ReviewRow {
            label: page.t("wizard.floor"),
            value: details
                .floor
                .map_or_else(|| page.t("review.none").to_owned(), |f| floor_label(f, page)),
        },
        ReviewRow {
            label: page.t("wizard.has_elevator"),
            value: elevator,
        },
        ReviewRow {
            label: page.t("wizard.notes"),
            value: or_none(&details.additional_notes, page),
        },
    ]
}

fn furniture_rows(furniture: &FurnitureDetails, page: &Page) -> Vec<ReviewRow> {
    let items = furniture
        .furniture
        .iter()
        .map(|item| format!("{} × {}", item.kind.label(page.locale), item.quantity))
        .collect::<Vec<_>>()
        .join("، ");

    vec![
        ReviewRow {
            label: page.t("wizard.rooms_count"),
            value: furniture
                .rooms_count
                .map_or_else(|| page.t("review.none").to_owned(), |n| n.to_string()),
        },
        ReviewRow {
            label: page.t("wizard.furniture_items"),
            value: if items.is_empty() {
                page.t("review.none").to_owned()
            } else {
                format!("{items} ({} {})", furniture.total_pieces(), page.t("review.pieces"))
            },
        },
        ReviewRow {
            label: page.t("wizard.upload_photos"),
            value: format!("{} {}", furniture.photos.len(), page.t("review.photos")),
        },
    ]
}

fn services_rows(services: &AdditionalServices, page: &Page) -> Vec<ReviewRow> {
    let locale = page.locale;
    let answer = |value: Option<YesNo>| {
        value.map_or_else(|| page.t("review.none").to_owned(), |v| v.label(locale).to_owned())
    };

    let mut rows = vec![
        ReviewRow {
            label: page.t("wizard.packaging"),
            value: answer(services.packaging),
        },
        ReviewRow {
            label: page.t("wizard.cleaning_before"),
            value: answer(services.cleaning_before),
        },
        ReviewRow {
            label: page.t("wizard.cleaning_after"),
            value: answer(services.cleaning_after),
        },
        ReviewRow {
            label: page.t("wizard.insurance"),
            value: answer(services.insurance),
        },
        ReviewRow {
            label: page.t("wizard.need_disassembly"),
            value: answer(services.need_disassembly),
        },
    ];

    if !services.disassembly_items.is_empty() {
        rows.push(ReviewRow {
            label: page.t("wizard.disassembly_items"),
            value: services
                .disassembly_items
                .iter()
                .map(|k| k.label(locale))
                .collect::<Vec<_>>()
                .join("، "),
        });
    }
    if !services.disassembly_notes.trim().is_empty() {
        rows.push(ReviewRow {
            label: page.t("wizard.disassembly_notes"),
            value: services.disassembly_notes.clone(),
        });
    }
    rows
}

/// Summary blocks for the review page, one per part of the form.
#[must_use]
pub fn review_sections(data: &OrderFormData, page: &Page) -> Vec<ReviewSection> {
    let date_time = &data.date_time;
    vec![
        ReviewSection {
            title: page.t("review.pickup"),
            edit_step: Step::PickupLocation.number(),
            rows: place_rows(&data.pickup_location, &data.pickup_details, page),
        },
        ReviewSection {
            title: page.t("review.destination"),
            edit_step: Step::DestinationLocation.number(),
            rows: place_rows(&data.destination_location, &data.destination_details, page),
        },
        ReviewSection {
            title: page.t("review.furniture"),
            edit_step: Step::Furniture.number(),
            rows: furniture_rows(&data.furniture_details, page),
        },
        ReviewSection {
            title: page.t("review.services"),
            edit_step: Step::Services.number(),
            rows: services_rows(&data.additional_services, page),
        },
        ReviewSection {
            title: page.t("review.date_time"),
            edit_step: Step::DateTime.number(),
            rows: vec![
                ReviewRow {
                    label: page.t("wizard.date"),
                    value: date_time
                        .date
                        .map_or_else(|| page.t("review.none").to_owned(), |d| d.to_string()),
                },
                ReviewRow {
                    label: page.t("wizard.time"),
                    value: format!("{} {}", date_time.time, date_time.period.label(page.locale)),
                },
            ],
        },
    ]
}

#[derive(Template, WebTemplate)]
#[template(path = "wizard/processing.html")]
pub struct ProcessingTemplate {
    pub page: Page,
    pub chrome: WizardChrome,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Values to show instead of the stored ones, e.g. a rejected post.
#[derive(Debug, Default)]
pub struct Draft {
    pub update: Option<StepUpdate>,
    pub query: String,
    pub errors: FieldErrors,
}

impl Draft {
    #[must_use]
    pub fn invalid(update: StepUpdate, errors: FieldErrors) -> Self {
        Self {
            update: Some(update),
            query: String::new(),
            errors,
        }
    }
}

/// Page for the wizard's current data step.
///
/// Details steps are prefilled from the location chosen just before them.
/// Returns `None` on the review and processing pages, which are rendered
/// by [`ReviewTemplate`] and [`ProcessingTemplate`].
#[must_use]
pub fn data_step_page(page: Page, wizard: &Wizard, draft: Draft, today: NaiveDate) -> Option<StepPage> {
    let step = wizard.step();
    let data = wizard.data();
    let chrome = WizardChrome::new(wizard.flow(), step, page.locale);
    let Draft {
        update,
        query,
        errors,
    } = draft;

    let view = match (step, update) {
        (
            Step::PickupLocation | Step::DestinationLocation,
            Some(StepUpdate::PickupLocation(location) | StepUpdate::DestinationLocation(location)),
        ) => StepPage::Location(LocationTemplate::new(page, chrome, location, query, errors)),
        (Step::PickupLocation, _) => StepPage::Location(LocationTemplate::new(
            page,
            chrome,
            data.pickup_location.clone(),
            query,
            errors,
        )),
        (Step::DestinationLocation, _) => StepPage::Location(LocationTemplate::new(
            page,
            chrome,
            data.destination_location.clone(),
            query,
            errors,
        )),
        (
            Step::PickupDetails | Step::DestinationDetails,
            Some(StepUpdate::PickupDetails(details) | StepUpdate::DestinationDetails(details)),
        ) => StepPage::Details(DetailsTemplate::new(page, chrome, details, errors)),
        (Step::PickupDetails, _) => StepPage::Details(DetailsTemplate::new(
            page,
            chrome,
            data.pickup_details.prefilled_from(&data.pickup_location),
            errors,
        )),
        (Step::DestinationDetails, _) => StepPage::Details(DetailsTemplate::new(
            page,
            chrome,
            data.destination_details
                .prefilled_from(&data.destination_location),
            errors,
        )),
        (Step::Furniture, Some(StepUpdate::Furniture(furniture))) => {
            StepPage::Furniture(FurnitureTemplate::new(page, chrome, furniture, errors))
        }
        (Step::Furniture, _) => StepPage::Furniture(FurnitureTemplate::new(
            page,
            chrome,
            data.furniture_details.clone(),
            errors,
        )),
        (Step::Services, Some(StepUpdate::Services(services))) => {
            StepPage::Services(ServicesTemplate::new(page, chrome, services, errors))
        }
        (Step::Services, _) => StepPage::Services(ServicesTemplate::new(
            page,
            chrome,
            data.additional_services.clone(),
            errors,
        )),
        (Step::DateTime, Some(StepUpdate::DateTime(selection))) => {
            StepPage::DateTime(DateTimeTemplate::new(page, chrome, selection, today, errors))
        }
        (Step::DateTime, _) => StepPage::DateTime(DateTimeTemplate::new(
            page,
            chrome,
            data.date_time,
            today,
            errors,
        )),
        (Step::Review | Step::Processing, _) => return None,
    };
    Some(view)
}

/// One of the data step templates.
pub enum StepPage {
    Location(LocationTemplate),
    Details(DetailsTemplate),
    Furniture(FurnitureTemplate),
    Services(ServicesTemplate),
    DateTime(DateTimeTemplate),
}

impl StepPage {
    fn errors(&self) -> &FieldErrors {
        match self {
            Self::Location(t) => &t.errors,
            Self::Details(t) => &t.errors,
            Self::Furniture(t) => &t.errors,
            Self::Services(t) => &t.errors,
            Self::DateTime(t) => &t.errors,
        }
    }
}

impl axum::response::IntoResponse for StepPage {
    fn into_response(self) -> axum::response::Response {
        let status = if self.errors().is_empty() {
            axum::http::StatusCode::OK
        } else {
            axum::http::StatusCode::UNPROCESSABLE_ENTITY
        };
        match self {
            Self::Location(t) => (status, t).into_response(),
            Self::Details(t) => (status, t).into_response(),
            Self::Furniture(t) => (status, t).into_response(),
            Self::Services(t) => (status, t).into_response(),
            Self::DateTime(t) => (status, t).into_response(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Preferences;

    fn page(locale: Locale) -> Page {
        Page::new(
            Preferences {
                locale,
                ..Preferences::default()
            },
            None,
            "/request-move",
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_chrome_for_first_step() {
        let chrome = WizardChrome::new(Flow::RequestMove, Step::PickupLocation, Locale::En);
        assert_eq!(chrome.base_path, "/request-move");
        assert_eq!(chrome.step_number, 1);
        assert_eq!(chrome.total_steps, 7);
        assert!(chrome.counted);
        assert!(!chrome.can_go_back);

        let review = WizardChrome::new(Flow::OrderMove, Step::Review, Locale::En);
        assert!(review.can_go_back);
        assert!(!review.counted);
    }

    #[test]
    fn test_map_embed_url_has_marker() {
        let url = map_embed_url(24.7136, 46.6753);
        assert!(url.starts_with("https://www.openstreetmap.org/export/embed.html?bbox=46.66530%2C24.70360"));
        assert!(url.ends_with("&marker=24.71360%2C46.67530"));
    }

    #[test]
    fn test_location_page_hides_coordinates_until_chosen() {
        let wizard = Wizard::new(Flow::RequestMove);
        let Some(StepPage::Location(view)) =
            data_step_page(page(Locale::Ar), &wizard, Draft::default(), today())
        else {
            panic!("expected the location step");
        };
        assert!(view.lat.is_empty());
        assert!(view.lng.is_empty());
    }

    #[test]
    fn test_rejected_draft_is_shown_with_errors() {
        let wizard = Wizard::new(Flow::RequestMove);
        let location = Location {
            address: "حي الروضة".to_owned(),
            ..Location::default()
        };
        let mut errors = FieldErrors::new();
        errors.add("city", "City is required");

        let view = data_step_page(
            page(Locale::Ar),
            &wizard,
            Draft::invalid(StepUpdate::PickupLocation(location), errors),
            today(),
        )
        .unwrap();
        let StepPage::Location(ref template) = view else {
            panic!("expected the location step");
        };
        assert_eq!(template.location.address, "حي الروضة");
        assert!(template.errors.has("city"));

        let response = axum::response::IntoResponse::into_response(view);
        assert_eq!(response.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_details_options() {
        let page = page(Locale::En);
        let details = PlaceDetails {
            floor: Some(0),
            has_elevator: Some(YesNo::Yes),
            elevator_size: Some(ElevatorSize::Large),
            ..PlaceDetails::default()
        };
        let chrome = WizardChrome::new(Flow::RequestMove, Step::PickupDetails, Locale::En);
        let view = DetailsTemplate::new(page, chrome, details, FieldErrors::new());

        assert_eq!(view.floors.len(), 20);
        assert_eq!(view.floors[0].label, "Ground");
        assert!(view.floors[0].selected);
        assert!(view.show_elevator_size);
        assert!(view.elevator_sizes.iter().any(|o| o.value == "large" && o.selected));
    }

    #[test]
    fn test_date_time_options() {
        let chrome = WizardChrome::new(Flow::RequestMove, Step::DateTime, Locale::En);
        let view = DateTimeTemplate::new(
            page(Locale::En),
            chrome,
            DateTimeSelection::default(),
            today(),
            FieldErrors::new(),
        );
        assert_eq!(view.hours.len(), 12);
        assert_eq!(view.minutes.len(), 4);
        assert_eq!(view.min_date, "2025-03-10");
        assert!(view.hours.iter().any(|o| o.value == "11" && o.selected));
        assert!(view.minutes.iter().any(|o| o.value == "30" && o.selected));
        assert!(view.date.is_empty());
    }

    #[test]
    fn test_review_sections() {
        let mut data = OrderFormData::default();
        data.pickup_location.address = "حي النخيل".to_owned();
        data.furniture_details.rooms_count = Some(3);
        data.furniture_details.set_item(FurnitureKind::Sofa, 2);
        data.additional_services.need_disassembly = Some(YesNo::Yes);
        data.additional_services.disassembly_items = vec![FurnitureKind::Bed];

        let sections = review_sections(&data, &page(Locale::En));
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[0].rows[0].value, "حي النخيل");
        assert_eq!(sections[1].edit_step, 3);
        assert_eq!(sections[2].rows[1].value, "Sofa × 2 (2 pieces)");
        assert!(sections[3].rows.iter().any(|r| r.value == "Bed"));
        assert_eq!(sections[4].rows[1].value, "11:30 AM");
    }
}
