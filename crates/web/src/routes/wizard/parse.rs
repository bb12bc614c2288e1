//! Turning a posted step form into a [`StepUpdate`].
//!
//! Parsing only deals with shape: numbers that are not numbers, times off
//! the quarter-hour grid. Whether a slice is complete enough to move on is
//! the wizard's gate.
//!
//! Shape errors never throw away the rest of the form. Parsers return the
//! slice they could read alongside the errors so a rejected page shows
//! what was posted.

use chrono::NaiveDate;
use naqlah_core::order::{
    AdditionalServices, DateTimeSelection, ElevatorSize, FurnitureDetails, FurnitureKind,
    Location, MoveTime, OrderFormData, Period, PlaceDetails, Step, StepUpdate, YesNo,
};
use naqlah_core::validation::FieldErrors;

use crate::routes::form_data::FormData;

/// Field name of a furniture quantity input, e.g. `qty_bed`.
pub fn quantity_field(kind: FurnitureKind) -> String {
    format!("qty_{}", kind.as_str())
}

/// A location as posted, plus whether the visitor supplied coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedLocation {
    pub location: Location,
    /// Both `lat` and `lng` were filled in and parsed.
    pub explicit_point: bool,
}

impl PostedLocation {
    /// Coordinates without an address need a reverse lookup before the
    /// step can pass.
    #[must_use]
    pub fn needs_lookup(&self) -> bool {
        self.explicit_point && self.location.address.trim().is_empty()
    }
}

/// Read steps 1 and 3. Missing coordinates keep the stored point.
pub fn location(data: &FormData, stored: &Location) -> PostedLocation {
    let lat = data.opt("lat").and_then(|v| v.parse::<f64>().ok());
    let lng = data.opt("lng").and_then(|v| v.parse::<f64>().ok());
    let point = lat
        .zip(lng)
        .filter(|(lat, lng)| (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lng));

    let (lat, lng) = point.unwrap_or((stored.lat, stored.lng));
    PostedLocation {
        location: Location {
            lat,
            lng,
            address: data.text("address").to_owned(),
            city: data.text("city").to_owned(),
        },
        explicit_point: point.is_some(),
    }
}

/// Read steps 2 and 4.
pub fn place_details(data: &FormData) -> PlaceDetails {
    let floor = data
        .opt("floor")
        // Unparseable floors fail the gate instead of vanishing
        .map(|v| v.parse::<u8>().unwrap_or(u8::MAX));
    let has_elevator = YesNo::from_form(data.text("has_elevator"));
    // Elevator size only matters when there is an elevator
    let elevator_size = has_elevator
        .filter(|e| e.is_yes())
        .and_then(|_| ElevatorSize::from_form(data.text("elevator_size")));

    PlaceDetails {
        city: data.text("city").to_owned(),
        full_address: data.text("full_address").to_owned(),
        building_name: data.text("building_name").to_owned(),
        floor,
        has_elevator,
        elevator_size,
        additional_notes: data.text("additional_notes").to_owned(),
    }
}

/// Read step 5. Photos from an earlier visit are kept unless new ones are
/// uploaded. Quantities that are not whole numbers are left out of the
/// slice and reported.
pub fn furniture(data: &FormData, stored: &FurnitureDetails) -> (FurnitureDetails, FieldErrors) {
    let mut errors = FieldErrors::new();
    let mut details = FurnitureDetails {
        rooms_count: data
            .opt("rooms_count")
            .map(|v| v.parse::<u8>().unwrap_or(u8::MAX)),
        furniture: Vec::new(),
        photos: stored.photos.clone(),
    };

    for kind in FurnitureKind::ALL {
        let field = quantity_field(kind);
        match data.opt(&field).map(str::parse::<u32>) {
            None => {}
            Some(Ok(quantity)) => details.set_item(kind, quantity),
            Some(Err(_)) => errors.add(field, "Quantity must be a whole number"),
        }
    }

    let uploaded = data.files("photos");
    if !uploaded.is_empty() {
        details.photos = uploaded;
    }

    (details, errors)
}

/// Read step 6.
pub fn services(data: &FormData) -> AdditionalServices {
    let need_disassembly = YesNo::from_form(data.text("need_disassembly"));
    let wants_disassembly = need_disassembly.is_some_and(YesNo::is_yes);

    let mut disassembly_items: Vec<FurnitureKind> = Vec::new();
    if wants_disassembly {
        for kind in data
            .all("disassembly_items")
            .into_iter()
            .filter_map(FurnitureKind::from_form)
        {
            if !disassembly_items.contains(&kind) {
                disassembly_items.push(kind);
            }
        }
    }

    AdditionalServices {
        packaging: YesNo::from_form(data.text("packaging")),
        cleaning_before: YesNo::from_form(data.text("cleaning_before")),
        cleaning_after: YesNo::from_form(data.text("cleaning_after")),
        insurance: YesNo::from_form(data.text("insurance")),
        need_disassembly,
        disassembly_items,
        disassembly_notes: if wants_disassembly {
            data.text("disassembly_notes").to_owned()
        } else {
            String::new()
        },
    }
}

/// Read step 7. A malformed date is read as no date.
pub fn date_time(data: &FormData) -> (DateTimeSelection, FieldErrors) {
    let mut errors = FieldErrors::new();

    let date = match data.opt("date") {
        None => None,
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("date", "Invalid date");
                None
            }
        },
    };

    let hour = data.text("hour").parse::<u8>().unwrap_or(0);
    let minute = data.text("minute").parse::<u8>().unwrap_or(u8::MAX);
    let time = MoveTime::new(hour, minute).unwrap_or_else(|_| {
        errors.add("time", "Please choose a valid time");
        MoveTime::default()
    });

    let period = Period::from_form(data.text("period")).unwrap_or_default();

    (DateTimeSelection { date, time, period }, errors)
}

/// Parse the slice for `step` from a posted form, with any shape errors.
///
/// Returns `None` for review and processing, which post no slice.
pub fn step_update(
    step: Step,
    data: &FormData,
    stored: &OrderFormData,
) -> Option<(StepUpdate, FieldErrors)> {
    let clean = |update| (update, FieldErrors::new());
    Some(match step {
        Step::PickupLocation => clean(StepUpdate::PickupLocation(
            location(data, &stored.pickup_location).location,
        )),
        Step::PickupDetails => clean(StepUpdate::PickupDetails(place_details(data))),
        Step::DestinationLocation => clean(StepUpdate::DestinationLocation(
            location(data, &stored.destination_location).location,
        )),
        Step::DestinationDetails => clean(StepUpdate::DestinationDetails(place_details(data))),
        Step::Furniture => {
            let (details, errors) = furniture(data, &stored.furniture_details);
            (StepUpdate::Furniture(details), errors)
        }
        Step::Services => clean(StepUpdate::Services(services(data))),
        Step::DateTime => {
            let (selection, errors) = date_time(data);
            (StepUpdate::DateTime(selection), errors)
        }
        Step::Review | Step::Processing => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use naqlah_core::Attachment;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        let mut data = FormData::default();
        for (name, value) in pairs {
            data.push_text(*name, *value);
        }
        data
    }

    #[test]
    fn test_location_keeps_stored_point_without_coordinates() {
        let stored = Location::default();
        let posted = location(&form(&[("address", "حي النرجس"), ("city", "الرياض")]), &stored);
        assert!(!posted.explicit_point);
        assert!(!posted.needs_lookup());
        assert!((posted.location.lat - stored.lat).abs() < f64::EPSILON);
        assert_eq!(posted.location.address, "حي النرجس");
    }

    #[test]
    fn test_location_with_point_and_no_address_needs_lookup() {
        let posted = location(
            &form(&[("lat", "21.5433"), ("lng", "39.1728")]),
            &Location::default(),
        );
        assert!(posted.explicit_point);
        assert!(posted.needs_lookup());
        assert!((posted.location.lat - 21.5433).abs() < 1e-9);
    }

    #[test]
    fn test_location_rejects_out_of_range_point() {
        let posted = location(&form(&[("lat", "123"), ("lng", "39")]), &Location::default());
        assert!(!posted.explicit_point);
    }

    #[test]
    fn test_place_details_floor_and_elevator() {
        let details = place_details(&form(&[
            ("city", "جدة"),
            ("full_address", "شارع التحلية"),
            ("floor", "3"),
            ("has_elevator", "no"),
            ("elevator_size", "large"),
        ]));
        assert_eq!(details.floor, Some(3));
        assert_eq!(details.has_elevator, Some(YesNo::No));
        assert_eq!(details.elevator_size, None);

        let bad = place_details(&form(&[("floor", "roof")]));
        assert_eq!(bad.floor, Some(u8::MAX));
    }

    #[test]
    fn test_furniture_quantities() {
        let stored = FurnitureDetails {
            photos: vec![Attachment {
                file_name: "old.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                size: 1,
            }],
            ..FurnitureDetails::default()
        };
        let (details, errors) = furniture(
            &form(&[("rooms_count", "3"), ("qty_bed", "2"), ("qty_sofa", "0")]),
            &stored,
        );
        assert!(errors.is_empty());
        assert_eq!(details.rooms_count, Some(3));
        assert_eq!(details.quantity_of(FurnitureKind::Bed), 2);
        assert_eq!(details.furniture.len(), 1);
        assert_eq!(details.photos, stored.photos);
    }

    #[test]
    fn test_furniture_bad_quantity_keeps_other_fields() {
        let (details, errors) = furniture(
            &form(&[("rooms_count", "4"), ("qty_sofa", "3"), ("qty_desk", "many")]),
            &FurnitureDetails::default(),
        );
        assert!(errors.has("qty_desk"));
        assert_eq!(details.rooms_count, Some(4));
        assert_eq!(details.quantity_of(FurnitureKind::Sofa), 3);
        assert_eq!(details.quantity_of(FurnitureKind::Desk), 0);
    }

    #[test]
    fn test_services_drop_disassembly_details_when_not_needed() {
        let services = services(&form(&[
            ("packaging", "yes"),
            ("need_disassembly", "no"),
            ("disassembly_items", "bed"),
            ("disassembly_notes", "x"),
        ]));
        assert_eq!(services.packaging, Some(YesNo::Yes));
        assert!(services.disassembly_items.is_empty());
        assert!(services.disassembly_notes.is_empty());

        let wanted = super::services(&form(&[
            ("need_disassembly", "yes"),
            ("disassembly_items", "bed"),
            ("disassembly_items", "bed"),
            ("disassembly_items", "wardrobe"),
        ]));
        assert_eq!(
            wanted.disassembly_items,
            vec![FurnitureKind::Bed, FurnitureKind::Wardrobe]
        );
    }

    #[test]
    fn test_date_time() {
        let (selection, errors) = date_time(&form(&[
            ("date", "2030-05-01"),
            ("hour", "9"),
            ("minute", "45"),
            ("period", "PM"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(selection.date, NaiveDate::from_ymd_opt(2030, 5, 1));
        assert_eq!(selection.time.to_string(), "09:45");
        assert_eq!(selection.period, Period::Pm);

        let (_, errors) = date_time(&form(&[("hour", "13"), ("minute", "10")]));
        assert!(errors.has("time"));
    }

    #[test]
    fn test_date_time_bad_date_keeps_time() {
        let (selection, errors) = date_time(&form(&[
            ("date", "tomorrow"),
            ("hour", "10"),
            ("minute", "30"),
            ("period", "PM"),
        ]));
        assert!(errors.has("date"));
        assert_eq!(selection.date, None);
        assert_eq!(selection.time.to_string(), "10:30");
        assert_eq!(selection.period, Period::Pm);
    }

    #[test]
    fn test_review_has_no_slice() {
        assert!(step_update(Step::Review, &FormData::default(), &OrderFormData::default()).is_none());
    }

    #[test]
    fn test_step_update_carries_shape_errors() {
        let (update, errors) = step_update(
            Step::Furniture,
            &form(&[("rooms_count", "2"), ("qty_bed", "lots")]),
            &OrderFormData::default(),
        )
        .unwrap();
        assert!(errors.has("qty_bed"));
        assert!(
            matches!(update, StepUpdate::Furniture(details) if details.rooms_count == Some(2))
        );
    }
}
