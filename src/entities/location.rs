use std::fmt;
use std::str::FromStr;

use geo_types::{coord, Coord, Rect};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

static LITERAL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)$").expect("valid coordinate pattern")
});

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parses a strict `"<lat>,<lng>"` literal. Returns `None` when the text
    /// is not shaped like a coordinate pair at all.
    pub fn parse_literal(input: &str) -> Option<Self> {
        let captures = LITERAL_PAIR.captures(input.trim())?;
        let lat = captures[1].parse::<f64>().ok()?;
        let lng = captures[2].parse::<f64>().ok()?;

        Some(Self { lat, lng })
    }

    /// Planar distance in degree space.
    pub fn planar_distance(&self, other: &Coordinates) -> f64 {
        let delta: Coord<f64> = Coord::from(*self) - Coord::from(*other);
        (delta.x * delta.x + delta.y * delta.y).sqrt()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.to_string()
    }
}

// x is longitude, y is latitude.
impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        coord! { x: coordinates.lng, y: coordinates.lat }
    }
}

/// Closed latitude/longitude rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox(Rect<f64>);

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self(Rect::new(
            coord! { x: west, y: south },
            coord! { x: east, y: north },
        ))
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut south, mut west) = (first.lat, first.lng);
        let (mut north, mut east) = (first.lat, first.lng);

        for p in points {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }

        Some(Self::new(south, west, north, east))
    }

    pub fn south(&self) -> f64 {
        self.0.min().y
    }

    pub fn west(&self) -> f64 {
        self.0.min().x
    }

    pub fn north(&self) -> f64 {
        self.0.max().y
    }

    pub fn east(&self) -> f64 {
        self.0.max().x
    }

    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        let min = self.0.min();
        let max = self.0.max();

        coordinates.lat >= min.y
            && coordinates.lat <= max.y
            && coordinates.lng >= min.x
            && coordinates.lng <= max.x
    }
}

/// `"south,west,north,east"`
impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid_input_error(format!("{} is not a bounding box", s)))?;

        match parts.as_slice() {
            [south, west, north, east] => Ok(Self::new(*south, *west, *north, *east)),
            _ => Err(invalid_input_error(format!("{} is not a bounding box", s))),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Serialize for BoundingBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BoundsRepr {
            south: self.south(),
            west: self.west(),
            north: self.north(),
            east: self.east(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let b = BoundsRepr::deserialize(deserializer)?;
        Ok(Self::new(b.south, b.west, b.north, b.east))
    }
}

/// Which input the next map click or geolocation result should populate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveField {
    #[default]
    Source,
    Destination,
}

/// Contents of a source/destination field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldInput {
    /// Free text typed by the user or filled from the place catalog.
    Text { value: String },
    /// Device position; trusted and never re-validated.
    Position { coordinates: Coordinates },
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text { value } => value.trim().is_empty(),
            Self::Position { coordinates: _ } => false,
        }
    }
}

impl Default for FieldInput {
    fn default() -> Self {
        Self::text("")
    }
}

impl fmt::Display for FieldInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { value } => f.write_str(value),
            Self::Position { coordinates } => write!(f, "{}", coordinates),
        }
    }
}

#[test]
fn parse_literal_accepts_strict_pairs() {
    assert_eq!(
        Coordinates::parse_literal("22.7196,75.8577"),
        Some(Coordinates::new(22.7196, 75.8577))
    );
    assert_eq!(
        Coordinates::parse_literal(" -10.5 , 10 "),
        Some(Coordinates::new(-10.5, 10.0))
    );
    assert_eq!(Coordinates::parse_literal("22.7196;75.8577"), None);
    assert_eq!(Coordinates::parse_literal("Vijay Nagar, 22.7"), None);
    assert_eq!(Coordinates::parse_literal("1.0,2.0,3.0"), None);
}

#[test]
fn bounding_box_is_closed() {
    let bounds = BoundingBox::new(22.5, 75.6, 23.0, 76.1);

    assert!(bounds.contains(&Coordinates::new(22.5, 75.6)));
    assert!(bounds.contains(&Coordinates::new(23.0, 76.1)));
    assert!(bounds.contains(&Coordinates::new(22.7196, 75.8577)));
    assert!(!bounds.contains(&Coordinates::new(10.0, 10.0)));
    assert!(!bounds.contains(&Coordinates::new(22.7, 76.2)));
}

#[test]
fn bounding_box_from_str() {
    let bounds: BoundingBox = "22.5, 75.6, 23.0, 76.1".parse().unwrap();
    assert_eq!(bounds, BoundingBox::new(22.5, 75.6, 23.0, 76.1));

    assert!("22.5,75.6,23.0".parse::<BoundingBox>().is_err());
    assert!("a,b,c,d".parse::<BoundingBox>().is_err());
}

#[test]
fn enclosing_box_covers_points() {
    let bounds = BoundingBox::enclosing(vec![
        Coordinates::new(22.75, 75.89),
        Coordinates::new(22.71, 75.85),
        Coordinates::new(22.73, 75.90),
    ])
    .unwrap();

    assert_eq!(bounds.south(), 22.71);
    assert_eq!(bounds.north(), 22.75);
    assert_eq!(bounds.west(), 75.85);
    assert_eq!(bounds.east(), 75.90);
    assert!(BoundingBox::enclosing(Vec::new()).is_none());
}
