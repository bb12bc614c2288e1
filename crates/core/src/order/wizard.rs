//! Step cursor for the booking wizard.
//!
//! A [`Wizard`] owns one [`OrderFormData`] and the current [`Step`]. Each
//! data step posts a [`StepUpdate`] carrying only its own slice; the wizard
//! checks the step's gate, merges the slice and moves on. Steps run
//! 1..=7, then [`Step::Review`], then [`Step::Processing`] once submitted.
//!
//! ```
//! use chrono::NaiveDate;
//! use naqlah_core::order::{Flow, Location, Step, StepUpdate, Wizard};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let mut wizard = Wizard::new(Flow::RequestMove);
//! assert_eq!(wizard.step(), Step::PickupLocation);
//!
//! // back is a no-op on the first step
//! wizard.back();
//! assert_eq!(wizard.step(), Step::PickupLocation);
//!
//! let pickup = Location { address: "حي الملقا".into(), city: "الرياض".into(), ..Location::default() };
//! wizard.next(StepUpdate::PickupLocation(pickup), today).unwrap();
//! assert_eq!(wizard.step(), Step::PickupDetails);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    AdditionalServices, DateTimeSelection, FurnitureDetails, Location, OrderFormData,
    PlaceDetails,
};
use crate::types::Locale;
use crate::validation::FieldErrors;

/// A position of the step cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    PickupLocation = 1,
    PickupDetails = 2,
    DestinationLocation = 3,
    DestinationDetails = 4,
    Furniture = 5,
    Services = 6,
    DateTime = 7,
    Review = 8,
    Processing = 9,
}

impl Step {
    /// The steps that collect data, in order.
    pub const DATA_STEPS: [Self; 7] = [
        Self::PickupLocation,
        Self::PickupDetails,
        Self::DestinationLocation,
        Self::DestinationDetails,
        Self::Furniture,
        Self::Services,
        Self::DateTime,
    ];

    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => Self::PickupLocation,
            2 => Self::PickupDetails,
            3 => Self::DestinationLocation,
            4 => Self::DestinationDetails,
            5 => Self::Furniture,
            6 => Self::Services,
            7 => Self::DateTime,
            8 => Self::Review,
            9 => Self::Processing,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_data_step(self) -> bool {
        (self as u8) <= Self::DateTime as u8
    }

    /// Steps 1 and 3 pick a point on the map.
    #[must_use]
    pub const fn is_location_step(self) -> bool {
        matches!(self, Self::PickupLocation | Self::DestinationLocation)
    }

    /// Share of the data steps completed, for the progress bar.
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        let done = u16::from(self.number().min(Self::DateTime.number()));
        u8::try_from(done * 100 / u16::from(Self::DateTime.number())).unwrap_or(100)
    }

    /// Heading shown above the step form.
    #[must_use]
    pub const fn title(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::PickupLocation, Locale::Ar) => "حدد موقع النقل الحالي",
            (Self::PickupLocation, Locale::En) => "Select the pickup location",
            (Self::PickupDetails, Locale::Ar) => "تفاصيل عنوان النقل الحالي",
            (Self::PickupDetails, Locale::En) => "Pickup address details",
            (Self::DestinationLocation, Locale::Ar) => "حدد موقع النقل الجديد",
            (Self::DestinationLocation, Locale::En) => "Select the destination",
            (Self::DestinationDetails, Locale::Ar) => "تفاصيل عنوان النقل الجديد",
            (Self::DestinationDetails, Locale::En) => "Destination address details",
            (Self::Furniture, Locale::Ar) => "تفاصيل الأثاث",
            (Self::Furniture, Locale::En) => "Furniture details",
            (Self::Services, Locale::Ar) => "الخدمات الإضافية",
            (Self::Services, Locale::En) => "Additional services",
            (Self::DateTime, Locale::Ar) => "موعد النقل",
            (Self::DateTime, Locale::En) => "Moving date and time",
            (Self::Review, Locale::Ar) => "مراجعة الطلب",
            (Self::Review, Locale::En) => "Review your request",
            (Self::Processing, Locale::Ar) => "جاري معالجة طلبك",
            (Self::Processing, Locale::En) => "Processing your request",
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("no wizard step {n}"))
    }
}

/// Which booking entry point a wizard belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    /// Guest flow from the marketing site; ends on the processing page.
    RequestMove,
    /// Logged-in flow; ends on the dashboard.
    OrderMove,
}

impl Flow {
    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::RequestMove => "/request-move",
            Self::OrderMove => "/order-move",
        }
    }

    /// Session key the flow's wizard is stored under.
    #[must_use]
    pub const fn session_key(self) -> &'static str {
        match self {
            Self::RequestMove => "wizard.request_move",
            Self::OrderMove => "wizard.order_move",
        }
    }

    #[must_use]
    pub const fn requires_login(self) -> bool {
        matches!(self, Self::OrderMove)
    }

    /// Whether a submitted request shows the processing page. The order-move
    /// flow goes straight back to the dashboard instead.
    #[must_use]
    pub const fn shows_processing(self) -> bool {
        matches!(self, Self::RequestMove)
    }
}

/// The slice of form data posted by one data step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepUpdate {
    PickupLocation(Location),
    PickupDetails(PlaceDetails),
    DestinationLocation(Location),
    DestinationDetails(PlaceDetails),
    Furniture(FurnitureDetails),
    Services(AdditionalServices),
    DateTime(DateTimeSelection),
}

impl StepUpdate {
    /// The step that produces this slice.
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::PickupLocation(_) => Step::PickupLocation,
            Self::PickupDetails(_) => Step::PickupDetails,
            Self::DestinationLocation(_) => Step::DestinationLocation,
            Self::DestinationDetails(_) => Step::DestinationDetails,
            Self::Furniture(_) => Step::Furniture,
            Self::Services(_) => Step::Services,
            Self::DateTime(_) => Step::DateTime,
        }
    }

    fn validate(&self, today: NaiveDate) -> FieldErrors {
        match self {
            Self::PickupLocation(l) | Self::DestinationLocation(l) => l.validate(),
            Self::PickupDetails(d) | Self::DestinationDetails(d) => d.validate(),
            Self::Furniture(f) => f.validate(),
            Self::Services(_) => FieldErrors::new(),
            Self::DateTime(dt) => dt.validate(today),
        }
    }

    fn apply(self, data: &mut OrderFormData) {
        match self {
            Self::PickupLocation(l) => data.pickup_location = l,
            Self::PickupDetails(d) => data.pickup_details = d,
            Self::DestinationLocation(l) => data.destination_location = l,
            Self::DestinationDetails(d) => data.destination_details = d,
            Self::Furniture(f) => data.furniture_details = f,
            Self::Services(s) => data.additional_services = s,
            Self::DateTime(dt) => data.date_time = dt,
        }
    }
}

/// Errors returned by wizard transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    /// The posted slice belongs to a different step than the cursor.
    #[error("expected data for step {expected:?}, got {got:?}")]
    OutOfSequence { expected: Step, got: Step },
    /// The step's gate rejected the slice.
    #[error("step has invalid fields")]
    Invalid(FieldErrors),
    /// Only data steps at or before the cursor can be edited.
    #[error("cannot jump to step {0:?}")]
    CannotEdit(Step),
    /// Submission is only possible from the review page.
    #[error("cannot submit from step {0:?}")]
    NotReviewing(Step),
    /// The request has already been submitted.
    #[error("request already submitted")]
    Finished,
}

/// Form data plus step cursor for one booking in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    flow: Flow,
    step: Step,
    data: OrderFormData,
}

impl Wizard {
    #[must_use]
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            step: Step::PickupLocation,
            data: OrderFormData::default(),
        }
    }

    #[must_use]
    pub const fn flow(&self) -> Flow {
        self.flow
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub const fn data(&self) -> &OrderFormData {
        &self.data
    }

    /// Merge the current step's slice and advance the cursor.
    ///
    /// Other slices are left untouched. Step 7 advances to the review page.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Finished`] after submission
    /// - [`WizardError::OutOfSequence`] if the slice is not for the current step
    /// - [`WizardError::Invalid`] if the step's gate fails; nothing changes
    pub fn next(&mut self, update: StepUpdate, today: NaiveDate) -> Result<Step, WizardError> {
        if self.step == Step::Processing {
            return Err(WizardError::Finished);
        }
        if update.step() != self.step {
            return Err(WizardError::OutOfSequence {
                expected: self.step,
                got: update.step(),
            });
        }

        let errors = update.validate(today);
        if !errors.is_empty() {
            return Err(WizardError::Invalid(errors));
        }

        update.apply(&mut self.data);
        self.step = Step::from_number(self.step.number() + 1).unwrap_or(Step::Review);
        Ok(self.step)
    }

    /// Move the cursor back one step.
    ///
    /// No-op on step 1 and once submitted; the review page goes back to
    /// step 7.
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::PickupLocation | Step::Processing => self.step,
            step => Step::from_number(step.number() - 1).unwrap_or(Step::PickupLocation),
        };
        self.step
    }

    /// Jump to an earlier data step, e.g. from an edit link on the review
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::CannotEdit`] for non-data steps or steps past
    /// the cursor, and [`WizardError::Finished`] after submission.
    pub fn edit(&mut self, target: Step) -> Result<Step, WizardError> {
        if self.step == Step::Processing {
            return Err(WizardError::Finished);
        }
        if !target.is_data_step() || target > self.step {
            return Err(WizardError::CannotEdit(target));
        }
        self.step = target;
        Ok(self.step)
    }

    /// Hand over the collected data and mark the wizard as submitted.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotReviewing`] unless the cursor is on the
    /// review page, or [`WizardError::Finished`] if already submitted.
    pub fn submit(&mut self) -> Result<OrderFormData, WizardError> {
        match self.step {
            Step::Review => {
                self.step = Step::Processing;
                Ok(std::mem::take(&mut self.data))
            }
            Step::Processing => Err(WizardError::Finished),
            step => Err(WizardError::NotReviewing(step)),
        }
    }
}
