//! Drawing primitives handed to the map view. No drawing happens here; the
//! map layer turns these into polylines and markers.

use serde::Serialize;

use crate::entities::{BoundingBox, Congestion, Coordinates, Route, RouteSelection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Yellow,
    Red,
    Gray,
}

impl From<Congestion> for Color {
    fn from(level: Congestion) -> Self {
        match level {
            Congestion::Low => Color::Green,
            Congestion::Medium => Color::Yellow,
            Congestion::High => Color::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub weight: u8,
    pub opacity: f32,
    pub dash: Option<&'static str>,
}

impl Stroke {
    pub fn active(level: Congestion) -> Self {
        Self {
            color: level.into(),
            weight: 7,
            opacity: 0.8,
            dash: None,
        }
    }

    pub fn alternate() -> Self {
        Self {
            color: Color::Gray,
            weight: 4,
            opacity: 0.6,
            dash: Some("5,10"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawSegment {
    pub start: Coordinates,
    pub end: Coordinates,
    pub stroke: Stroke,
}

/// A non-active candidate. Clicking it on the map selects `index`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlternatePath {
    pub index: usize,
    pub route_name: String,
    pub segments: Vec<DrawSegment>,
}

impl AlternatePath {
    pub fn click(&self, selection: &mut RouteSelection) -> bool {
        selection.select(self.index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderPlan {
    pub active_index: usize,
    pub segments: Vec<DrawSegment>,
    pub source_marker: Coordinates,
    pub destination_marker: Coordinates,
    pub viewport: BoundingBox,
    pub alternates: Vec<AlternatePath>,
}

impl RenderPlan {
    /// Builds the plan for the active route, or `None` when there is nothing
    /// to draw.
    pub fn from_selection(selection: &RouteSelection) -> Option<Self> {
        let active_index = selection.active_index()?;
        let active = selection.active_route()?;

        let source_marker = active.origin()?;
        let destination_marker = active.destination()?;
        let viewport = BoundingBox::enclosing(
            active
                .segments
                .iter()
                .flat_map(|segment| [segment.start(), segment.end()]),
        )?;

        let segments = active
            .segments
            .iter()
            .map(|segment| DrawSegment {
                start: segment.start(),
                end: segment.end(),
                stroke: Stroke::active(segment.congestion_level),
            })
            .collect();

        let alternates = selection
            .routes()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != active_index)
            .map(|(index, route)| alternate(index, route))
            .collect();

        Some(Self {
            active_index,
            segments,
            source_marker,
            destination_marker,
            viewport,
            alternates,
        })
    }
}

fn alternate(index: usize, route: &Route) -> AlternatePath {
    AlternatePath {
        index,
        route_name: route.route_name.clone(),
        segments: route
            .segments
            .iter()
            .map(|segment| DrawSegment {
                start: segment.start(),
                end: segment.end(),
                stroke: Stroke::alternate(),
            })
            .collect(),
    }
}
