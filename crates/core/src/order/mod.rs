//! Move-request form data.
//!
//! [`OrderFormData`] is the single object the booking wizard fills in, one
//! slice per step. The select-style fields are closed enums so a posted
//! form can only carry values the widgets offer.

pub mod wizard;

pub use wizard::{Flow, Step, StepUpdate, Wizard, WizardError};

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Attachment, Locale};
use crate::validation::FieldErrors;

/// Map centre used before the visitor picks a point (Riyadh).
pub const DEFAULT_LAT: f64 = 24.7136;
/// See [`DEFAULT_LAT`].
pub const DEFAULT_LNG: f64 = 46.6753;
/// City used when reverse geocoding fails.
pub const DEFAULT_CITY: &str = "الرياض";

// =============================================================================
// Select values
// =============================================================================

/// A yes/no select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Parse a select value. The empty placeholder option yields `None`, as
    /// does anything unexpected.
    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        match value.trim() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Yes, Locale::Ar) => "نعم",
            (Self::Yes, Locale::En) => "Yes",
            (Self::No, Locale::Ar) => "لا",
            (Self::No, Locale::En) => "No",
        }
    }
}

/// Elevator size on the details steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevatorSize {
    Small,
    Medium,
    Large,
}

impl ElevatorSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Small, Locale::Ar) => "صغير",
            (Self::Small, Locale::En) => "Small",
            (Self::Medium, Locale::Ar) => "وسط",
            (Self::Medium, Locale::En) => "Medium",
            (Self::Large, Locale::Ar) => "كبير",
            (Self::Large, Locale::En) => "Large",
        }
    }
}

/// Furniture catalog offered on the furniture step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureKind {
    Bed,
    Wardrobe,
    Sofa,
    Table,
    Desk,
}

impl FurnitureKind {
    pub const ALL: [Self; 5] = [
        Self::Bed,
        Self::Wardrobe,
        Self::Sofa,
        Self::Table,
        Self::Desk,
    ];

    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bed => "bed",
            Self::Wardrobe => "wardrobe",
            Self::Sofa => "sofa",
            Self::Table => "table",
            Self::Desk => "desk",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Bed, Locale::Ar) => "سرير",
            (Self::Bed, Locale::En) => "Bed",
            (Self::Wardrobe, Locale::Ar) => "دولاب",
            (Self::Wardrobe, Locale::En) => "Wardrobe",
            (Self::Sofa, Locale::Ar) => "صوفا",
            (Self::Sofa, Locale::En) => "Sofa",
            (Self::Table, Locale::Ar) => "طاولة",
            (Self::Table, Locale::En) => "Table",
            (Self::Desk, Locale::Ar) => "مكتب",
            (Self::Desk, Locale::En) => "Desk",
        }
    }
}

/// Half of the day for [`MoveTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        match value.trim() {
            "AM" | "am" => Some(Self::Am),
            "PM" | "pm" => Some(Self::Pm),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Am, Locale::Ar) => "ص",
            (Self::Pm, Locale::Ar) => "م",
            (Self::Am, Locale::En) => "AM",
            (Self::Pm, Locale::En) => "PM",
        }
    }
}

// =============================================================================
// Step slices
// =============================================================================

/// A point picked on the map (steps 1 and 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub city: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
            address: String::new(),
            city: String::new(),
        }
    }
}

impl Location {
    /// Whether both the address and the city are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.city.trim().is_empty()
    }

    /// Address shown when reverse geocoding is unavailable: the coordinates
    /// to four decimals.
    #[must_use]
    pub fn coordinate_label(lat: f64, lng: f64) -> String {
        format!("{lat:.4}, {lng:.4}")
    }

    /// Location for a bare point, labelled by its coordinates in the
    /// default city.
    #[must_use]
    pub fn fallback(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: Self::coordinate_label(lat, lng),
            city: DEFAULT_CITY.to_owned(),
        }
    }

    pub(crate) fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.address.trim().is_empty() {
            errors.add("address", "Please select a location on the map");
        }
        if self.city.trim().is_empty() {
            errors.add("city", "City is required");
        }
        errors
    }
}

/// Building details for one end of the move (steps 2 and 4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub city: String,
    pub full_address: String,
    pub building_name: String,
    pub floor: Option<u8>,
    pub has_elevator: Option<YesNo>,
    pub elevator_size: Option<ElevatorSize>,
    pub additional_notes: String,
}

impl PlaceDetails {
    /// Highest selectable floor; 0 is the ground floor.
    pub const MAX_FLOOR: u8 = 19;

    /// Copy of these details with an empty city or address taken from the
    /// location picked on the previous step.
    #[must_use]
    pub fn prefilled_from(&self, location: &Location) -> Self {
        let mut details = self.clone();
        if details.city.trim().is_empty() {
            details.city.clone_from(&location.city);
        }
        if details.full_address.trim().is_empty() {
            details.full_address.clone_from(&location.address);
        }
        details
    }

    pub(crate) fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.city.trim().is_empty() {
            errors.add("city", "City is required");
        }
        if self.full_address.trim().is_empty() {
            errors.add("full_address", "Full address is required");
        }
        if self.floor.is_some_and(|f| f > Self::MAX_FLOOR) {
            errors.add("floor", "Invalid floor");
        }
        errors
    }
}

/// One furniture line on step 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub kind: FurnitureKind,
    pub quantity: u32,
}

/// Room count, furniture list and photos (step 5).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureDetails {
    pub rooms_count: Option<u8>,
    pub furniture: Vec<FurnitureItem>,
    pub photos: Vec<Attachment>,
}

impl FurnitureDetails {
    /// Largest selectable room count.
    pub const MAX_ROOMS: u8 = 10;

    /// Set the quantity for a furniture kind. An existing line is replaced
    /// rather than duplicated; a quantity of 0 removes the line.
    pub fn set_item(&mut self, kind: FurnitureKind, quantity: u32) {
        if quantity == 0 {
            self.furniture.retain(|item| item.kind != kind);
            return;
        }
        if let Some(item) = self.furniture.iter_mut().find(|item| item.kind == kind) {
            item.quantity = quantity;
        } else {
            self.furniture.push(FurnitureItem { kind, quantity });
        }
    }

    #[must_use]
    pub fn quantity_of(&self, kind: FurnitureKind) -> u32 {
        self.furniture
            .iter()
            .find(|item| item.kind == kind)
            .map_or(0, |item| item.quantity)
    }

    /// Total number of pieces across all lines.
    #[must_use]
    pub fn total_pieces(&self) -> u32 {
        self.furniture.iter().map(|item| item.quantity).sum()
    }

    pub(crate) fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.rooms_count {
            None => errors.add("rooms_count", "Please select the number of rooms"),
            Some(n) if n == 0 || n > Self::MAX_ROOMS => {
                errors.add("rooms_count", "Invalid number of rooms");
            }
            Some(_) => {}
        }
        for (i, photo) in self.photos.iter().enumerate() {
            if !photo.is_image() {
                errors.add(format!("photos.{i}"), "Only image files are allowed");
            } else if photo.size > Attachment::MAX_SIZE {
                errors.add(format!("photos.{i}"), "File must be 10 MB or smaller");
            }
        }
        errors
    }
}

/// Optional extras (step 6). Every field may stay unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalServices {
    pub packaging: Option<YesNo>,
    pub cleaning_before: Option<YesNo>,
    pub cleaning_after: Option<YesNo>,
    pub insurance: Option<YesNo>,
    pub need_disassembly: Option<YesNo>,
    pub disassembly_items: Vec<FurnitureKind>,
    pub disassembly_notes: String,
}

impl AdditionalServices {
    /// Whether any extra service was answered "yes".
    #[must_use]
    pub fn any_selected(&self) -> bool {
        [
            self.packaging,
            self.cleaning_before,
            self.cleaning_after,
            self.insurance,
            self.need_disassembly,
        ]
        .iter()
        .any(|v| v.is_some_and(YesNo::is_yes))
    }
}

/// Error for a time outside the selectable grid.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid time {hour:02}:{minute:02}")]
pub struct MoveTimeError {
    pub hour: u8,
    pub minute: u8,
}

/// Time of day on a 12-hour clock, restricted to quarter hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTime {
    hour: u8,
    minute: u8,
}

impl Default for MoveTime {
    fn default() -> Self {
        Self {
            hour: 11,
            minute: 30,
        }
    }
}

impl MoveTime {
    /// Minutes offered by the select.
    pub const MINUTES: [u8; 4] = [0, 15, 30, 45];

    /// # Errors
    ///
    /// Returns [`MoveTimeError`] unless `hour` is 1-12 and `minute` is a
    /// quarter hour.
    pub fn new(hour: u8, minute: u8) -> Result<Self, MoveTimeError> {
        if (1..=12).contains(&hour) && Self::MINUTES.contains(&minute) {
            Ok(Self { hour, minute })
        } else {
            Err(MoveTimeError { hour, minute })
        }
    }

    /// Parse the `HH:MM` value posted by the time selects.
    ///
    /// # Errors
    ///
    /// Returns [`MoveTimeError`] for malformed or out-of-grid values.
    pub fn parse(value: &str) -> Result<Self, MoveTimeError> {
        let invalid = MoveTimeError { hour: 0, minute: 0 };
        let (h, m) = value.trim().split_once(':').ok_or(invalid)?;
        let hour = h.parse().map_err(|_| invalid)?;
        let minute = m.parse().map_err(|_| invalid)?;
        Self::new(hour, minute)
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for MoveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Moving date and time (step 7).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeSelection {
    pub date: Option<NaiveDate>,
    pub time: MoveTime,
    pub period: Period,
}

impl DateTimeSelection {
    pub(crate) fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.date {
            None => errors.add("date", "Please select a date"),
            Some(date) if date < today => errors.add("date", "Date cannot be in the past"),
            Some(_) => {}
        }
        errors
    }
}

// =============================================================================
// Whole form
// =============================================================================

/// Everything the wizard collects for one move request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFormData {
    pub pickup_location: Location,
    pub pickup_details: PlaceDetails,
    pub destination_location: Location,
    pub destination_details: PlaceDetails,
    pub furniture_details: FurnitureDetails,
    pub additional_services: AdditionalServices,
    pub date_time: DateTimeSelection,
}
