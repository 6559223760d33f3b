use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// A named entry of the place catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinates,
}

impl Place {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(lat, lng),
        }
    }
}
