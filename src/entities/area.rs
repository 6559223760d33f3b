use serde::{Deserialize, Serialize};

use crate::entities::{BoundingBox, Coordinates};

/// The metropolitan area the service operates in. Geocoder queries are scoped
/// to it and resolved coordinates must fall inside its bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub city: String,
    pub region: String,
    pub country: String,
    /// ISO 3166-1 alpha-2, lowercase.
    pub country_code: String,
    pub bounds: BoundingBox,
}

impl ServiceArea {
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.bounds.contains(coordinates)
    }

    /// Heuristic for text that came back from a reverse geocoder: a comma
    /// separated address ending up in our country.
    pub fn looks_like_address(&self, input: &str) -> bool {
        input.contains(',') && input.to_lowercase().contains(&self.country.to_lowercase())
    }

    pub fn matches_region(&self, region: &str) -> bool {
        region.trim().eq_ignore_ascii_case(&self.region)
    }

    pub fn mentions_city(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.city.to_lowercase())
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self {
            city: "Indore".into(),
            region: "Madhya Pradesh".into(),
            country: "India".into(),
            country_code: "in".into(),
            bounds: BoundingBox::new(22.5, 75.6, 23.0, 76.1),
        }
    }
}

#[test]
fn address_heuristic() {
    let area = ServiceArea::default();

    assert!(area.looks_like_address("56 Dukaan, New Palasia, Indore, Madhya Pradesh, India"));
    assert!(!area.looks_like_address("Vijay Nagar, Indore"));
    assert!(!area.looks_like_address("India Gate"));
}

#[test]
fn region_and_city_matching() {
    let area = ServiceArea::default();

    assert!(area.matches_region("madhya pradesh"));
    assert!(!area.matches_region("Maharashtra"));
    assert!(area.mentions_city("Rajwada, INDORE, Madhya Pradesh"));
    assert!(!area.mentions_city("Bhopal, Madhya Pradesh"));
}
