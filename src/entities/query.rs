use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, FieldInput, TravelMode};
use crate::error::{invalid_input_error, Error};

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%I:%M %p";
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Everything needed to ask for routes, before place resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub source: FieldInput,
    pub destination: FieldInput,
    pub departure: NaiveDateTime,
    pub travel_mode: TravelMode,
}

/// Body of `POST /api/routes/` on the routing backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub source: String,
    pub destination: String,
    pub date_time: String,
    pub travel_mode: TravelMode,
}

impl RouteRequest {
    pub fn new(
        source: Coordinates,
        destination: Coordinates,
        departure: NaiveDateTime,
        travel_mode: TravelMode,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            date_time: departure.format(WIRE_FORMAT).to_string(),
            travel_mode,
        }
    }
}

/// Combines the date picker (`dd-mm-yyyy`) and time picker (`h:mm AM`)
/// values. A missing half defaults to the current local date or time.
pub fn parse_departure(date: Option<&str>, time: Option<&str>) -> Result<NaiveDateTime, Error> {
    let now = Local::now().naive_local();

    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, DATE_FORMAT)
            .map_err(|_| invalid_input_error(format!("{} is not a valid date", d)))?,
        None => now.date(),
    };

    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => NaiveTime::parse_from_str(&t.to_uppercase(), TIME_FORMAT)
            .map_err(|_| invalid_input_error(format!("{} is not a valid time", t)))?,
        None => now.time(),
    };

    Ok(date.and_time(time))
}

#[test]
fn departure_from_pickers() {
    let departure = parse_departure(Some("18-10-2026"), Some("5:07 pm")).unwrap();
    assert_eq!(departure.format(WIRE_FORMAT).to_string(), "2026-10-18T17:07:00");

    let midnight = parse_departure(Some("01-01-2027"), Some("12:30 AM")).unwrap();
    assert_eq!(midnight.format(WIRE_FORMAT).to_string(), "2027-01-01T00:30:00");

    assert!(parse_departure(Some("2026-10-18"), None).is_err());
    assert!(parse_departure(None, Some("25:00 PM")).is_err());
}

#[test]
fn route_request_wire_shape() {
    let departure = parse_departure(Some("18-10-2026"), Some("9:00 AM")).unwrap();
    let request = RouteRequest::new(
        Coordinates::new(22.7519, 75.8937),
        Coordinates::new(22.7196, 75.8577),
        departure,
        TravelMode::Car,
    );

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        serde_json::json!({
            "source": "22.7519,75.8937",
            "destination": "22.7196,75.8577",
            "date_time": "2026-10-18T09:00:00",
            "travel_mode": "car",
        })
    );
}
