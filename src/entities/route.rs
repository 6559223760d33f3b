use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Traffic density of a segment. The routing backend labels it with the color
/// it should be drawn in; the level names are accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Congestion {
    #[serde(rename = "green", alias = "low")]
    Low,
    #[serde(rename = "yellow", alias = "medium")]
    Medium,
    #[serde(rename = "red", alias = "high")]
    High,
}

impl Congestion {
    pub fn is_congested(&self) -> bool {
        !matches!(self, Self::Low)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Bike,
    Car,
    Walk,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_id: Option<i64>,
    pub latitude_start: f64,
    pub longitude_start: f64,
    pub latitude_end: f64,
    pub longitude_end: f64,
    pub length_m: f64,
    pub speed_kmh: f64,
    pub congestion_level: Congestion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_time_min: Option<f64>,
}

impl RouteSegment {
    pub fn start(&self) -> Coordinates {
        Coordinates::new(self.latitude_start, self.longitude_start)
    }

    pub fn end(&self) -> Coordinates {
        Coordinates::new(self.latitude_end, self.longitude_end)
    }
}

/// A candidate route as returned by the routing backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_name: String,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    #[serde(default)]
    pub recommended: bool,
    pub segments: Vec<RouteSegment>,
}

impl Route {
    /// Share of segments at medium or high congestion, as a rounded percentage.
    pub fn congestion_percentage(&self) -> u32 {
        if self.segments.is_empty() {
            return 0;
        }

        let congested = self
            .segments
            .iter()
            .filter(|segment| segment.congestion_level.is_congested())
            .count();

        (100.0 * congested as f64 / self.segments.len() as f64).round() as u32
    }

    pub fn origin(&self) -> Option<Coordinates> {
        self.segments.first().map(RouteSegment::start)
    }

    pub fn destination(&self) -> Option<Coordinates> {
        self.segments.last().map(RouteSegment::end)
    }
}


#[test]
fn congestion_reads_colors_and_levels() {
    let levels: Vec<Congestion> =
        serde_json::from_str(r#"["green", "yellow", "red", "low", "medium", "high"]"#).unwrap();

    assert_eq!(
        levels,
        vec![
            Congestion::Low,
            Congestion::Medium,
            Congestion::High,
            Congestion::Low,
            Congestion::Medium,
            Congestion::High,
        ]
    );
    assert_eq!(serde_json::to_string(&Congestion::High).unwrap(), r#""red""#);
}

#[test]
fn route_decodes_backend_payload() {
    let payload = r#"{
        "route_name": "Shortest Distance",
        "total_distance_km": 4.21,
        "total_time_min": 11.3,
        "segments": [{
            "road_id": 32659148,
            "latitude_start": 22.7519,
            "longitude_start": 75.8937,
            "latitude_end": 22.7501,
            "longitude_end": 75.8921,
            "speed_kmh": 24.2,
            "congestion_level": "yellow",
            "length_m": 250.4,
            "travel_time_min": 0.6
        }]
    }"#;

    let route: Route = serde_json::from_str(payload).unwrap();

    assert!(!route.recommended);
    assert_eq!(route.segments[0].road_id, Some(32659148));
    assert_eq!(route.origin(), Some(Coordinates::new(22.7519, 75.8937)));
    assert_eq!(route.destination(), Some(Coordinates::new(22.7501, 75.8921)));
}

#[test]
fn congestion_percentage_rounds() {
    use fixtures::route;
    use Congestion::*;

    assert_eq!(route("a", false, &[Low, Medium, High]).congestion_percentage(), 67);
    assert_eq!(route("b", false, &[Low, Low, Low, High]).congestion_percentage(), 25);
    assert_eq!(route("c", false, &[Low, Low]).congestion_percentage(), 0);
    assert_eq!(route("d", false, &[Medium]).congestion_percentage(), 100);
    assert_eq!(route("e", false, &[]).congestion_percentage(), 0);
}
