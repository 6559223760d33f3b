use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::entities::{Coordinates, Place};
use crate::error::{config_error, invalid_input_error, Error};

/// ~700 m in degrees at Indore's latitude.
pub const DEFAULT_NEAREST_THRESHOLD: f64 = 0.007;

const INDORE: &[(&str, f64, f64)] = &[
    // areas
    ("Vijay Nagar", 22.7519, 75.8937),
    ("Rajwada", 22.7196, 75.8577),
    ("Palasia", 22.7193, 75.8800),
    ("Bhawarkua", 22.6986, 75.8647),
    ("Nipania", 22.7177, 75.9121),
    ("Chhoti Gwaltoli", 22.7205, 75.8642),
    ("Bengali Square", 22.7198, 75.9042),
    ("Geeta Bhawan", 22.7190, 75.8730),
    ("LIG Square", 22.7372, 75.8896),
    ("MG Road", 22.7192, 75.8577),
    ("Khandwa Road", 22.7177, 75.9121),
    ("AB Road", 22.7193, 75.8800),
    ("Ring Road", 22.6986, 75.8647),
    ("MR 10", 22.7205, 75.8642),
    ("MR 9", 22.7198, 75.9042),
    ("MR 8", 22.7190, 75.8730),
    ("MR 7", 22.7372, 75.8896),
    ("MR 6", 22.7192, 75.8577),
    ("MR 5", 22.7177, 75.9121),
    ("MR 4", 22.7193, 75.8800),
    ("MR 3", 22.6986, 75.8647),
    ("MR 2", 22.7205, 75.8642),
    ("MR 1", 22.7198, 75.9042),
    ("Mahalaxmi Nagar Main Road", 22.7597, 75.9111),
    // malls
    ("Treasure Island Mall", 22.7376, 75.8892),
    ("C21 Mall", 22.7376, 75.8892),
    ("Phoenix Citadel Mall", 22.7376, 75.8892),
    ("Central Mall", 22.7196, 75.8577),
    ("Malhar Mega Mall", 22.7196, 75.8577),
    ("Prestige Mall", 22.7196, 75.8577),
    ("Sapna Sangeeta Mall", 22.7196, 75.8577),
    ("Rajendra Nagar Mall", 22.7196, 75.8577),
    // hospitals
    ("MY Hospital", 22.7196, 75.8577),
    ("Choithram Hospital", 22.7196, 75.8577),
    ("Bombay Hospital", 22.7196, 75.8577),
    ("Apollo Hospital", 22.7196, 75.8577),
    ("Medanta Hospital", 22.7196, 75.8577),
    ("Sri Aurobindo Hospital", 22.7196, 75.8577),
    ("Kokilaben Hospital", 22.7196, 75.8577),
    ("Life Care Hospital", 22.7196, 75.8577),
    ("Shri Krishna Hospital", 22.7196, 75.8577),
    ("City Hospital", 22.7196, 75.8577),
    // landmarks
    ("Khajrana Temple", 22.7342, 75.9180),
    ("Sarafa Bazaar", 22.7197, 75.8555),
    ("Rajwada Palace", 22.7196, 75.8577),
    ("Lalbagh Palace", 22.7196, 75.8577),
    ("Kanch Mandir", 22.7196, 75.8577),
    ("Gomatgiri", 22.7196, 75.8577),
    ("Patalpani", 22.7196, 75.8577),
    ("Tincha Falls", 22.7196, 75.8577),
    ("Ralamandal", 22.7196, 75.8577),
    ("Choral Dam", 22.7196, 75.8577),
    // transport
    ("Indore Airport", 22.7280, 75.8011),
    ("Railway Station", 22.7206, 75.8648),
    ("Bus Stand", 22.7196, 75.8577),
    ("Devi Ahilya Bai Holkar Airport", 22.7280, 75.8011),
    ("Indore Junction", 22.7206, 75.8648),
    ("Rajendra Nagar Station", 22.7196, 75.8577),
    ("Lakshmibai Nagar Station", 22.7196, 75.8577),
    // education
    ("IIT Indore", 22.7196, 75.8577),
    ("IIM Indore", 22.7196, 75.8577),
    ("DAVV University", 22.7196, 75.8577),
    ("IPS Academy", 22.7196, 75.8577),
    ("SGSITS", 22.7196, 75.8577),
    ("Medicaps University", 22.7196, 75.8577),
    ("Acropolis Institute", 22.7196, 75.8577),
    ("Vikram University", 22.7196, 75.8577),
    // markets
    ("Rajwada Market", 22.7196, 75.8577),
    ("Sarafa Market", 22.7197, 75.8555),
    ("Chappan Dukaan", 22.7196, 75.8577),
    ("56 Dukaan", 22.7196, 75.8577),
    ("Khatipura Market", 22.7196, 75.8577),
    ("Vijay Nagar Market", 22.7519, 75.8937),
    ("Palasia Market", 22.7193, 75.8800),
    ("Bhawarkua Market", 22.6986, 75.8647),
    // parks
    ("Nehru Park", 22.7196, 75.8577),
    ("Kamla Nehru Park", 22.7196, 75.8577),
    ("Regional Park", 22.7196, 75.8577),
    ("Indore Zoo", 22.7196, 75.8577),
    ("Patalpani Waterfall", 22.7196, 75.8577),
    ("Tincha Waterfall", 22.7196, 75.8577),
    // government
    ("Collector Office", 22.7196, 75.8577),
    ("Municipal Corporation", 22.7196, 75.8577),
    ("Police Station", 22.7196, 75.8577),
    ("District Court", 22.7196, 75.8577),
    ("High Court", 22.7196, 75.8577),
    ("Passport Office", 22.7196, 75.8577),
    ("RTO Office", 22.7196, 75.8577),
    // religious
    ("Gurudwara", 22.7196, 75.8577),
    ("Masjid", 22.7196, 75.8577),
    ("Church", 22.7196, 75.8577),
    ("Jain Temple", 22.7196, 75.8577),
    ("Hanuman Temple", 22.7196, 75.8577),
    ("Ganesh Temple", 22.7196, 75.8577),
    ("Shiv Temple", 22.7196, 75.8577),
    ("Durga Temple", 22.7196, 75.8577),
];

/// Fixed catalog of named places. Loaded once and read-only afterwards;
/// iteration follows the order the places were given in.
#[derive(Clone, Debug)]
pub struct Gazetteer {
    places: Vec<Place>,
    index: HashMap<String, usize>,
    threshold: f64,
}

impl Gazetteer {
    pub fn new(places: Vec<Place>, threshold: f64) -> Result<Self, Error> {
        let mut index = HashMap::with_capacity(places.len());

        for (i, place) in places.iter().enumerate() {
            if index.insert(place.name.clone(), i).is_some() {
                return Err(invalid_input_error(format!(
                    "duplicate place name {}",
                    place.name
                )));
            }
        }

        Ok(Self {
            places,
            index,
            threshold,
        })
    }

    /// The built-in Indore catalog.
    pub fn indore(threshold: f64) -> Self {
        let places: Vec<Place> = INDORE
            .iter()
            .map(|(name, lat, lng)| Place::new(*name, *lat, *lng))
            .collect();
        let index = places
            .iter()
            .enumerate()
            .map(|(i, place)| (place.name.clone(), i))
            .collect();

        Self {
            places,
            index,
            threshold,
        }
    }

    /// Reads a JSON array of `{ "name", "coordinates": { "lat", "lng" } }`.
    pub fn from_json_file(path: &Path, threshold: f64) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|err| {
            tracing::error!("failed to read {}: {}", path.display(), err);
            config_error("GAZETTEER_PATH")
        })?;
        let places: Vec<Place> = serde_json::from_str(&contents)?;

        tracing::info!("loaded {} places from {}", places.len(), path.display());

        Self::new(places, threshold)
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Exact, case-sensitive name match.
    pub fn lookup(&self, name: &str) -> Option<Coordinates> {
        self.index.get(name).map(|&i| self.places[i].coordinates)
    }

    /// First place, in catalog order, whose name occurs in `text` ignoring case.
    pub fn find_in(&self, text: &str) -> Option<&Place> {
        let haystack = text.to_lowercase();

        self.places
            .iter()
            .find(|place| haystack.contains(&place.name.to_lowercase()))
    }

    /// Name of the closest place, provided it lies within the threshold
    /// (inclusive). Ties go to the earlier place.
    pub fn nearest(&self, at: Coordinates) -> Option<&str> {
        let mut best: Option<(&Place, f64)> = None;

        for place in &self.places {
            let distance = place.coordinates.planar_distance(&at);
            match best {
                Some((_, min)) if distance >= min => {}
                _ => best = Some((place, distance)),
            }
        }

        best.filter(|(_, distance)| *distance <= self.threshold)
            .map(|(place, _)| place.name.as_str())
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::indore(DEFAULT_NEAREST_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Gazetteer {
        Gazetteer::new(
            vec![
                Place::new("Origin", 0.0, 0.0),
                Place::new("Twin", 0.0, 0.0),
                Place::new("North", 2.0, 0.0),
            ],
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn every_builtin_name_is_unique() {
        let gazetteer = Gazetteer::default();
        assert_eq!(gazetteer.places().len(), INDORE.len());
        assert!(Gazetteer::new(gazetteer.places().to_vec(), DEFAULT_NEAREST_THRESHOLD).is_ok());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let gazetteer = Gazetteer::default();

        assert_eq!(
            gazetteer.lookup("Vijay Nagar"),
            Some(Coordinates::new(22.7519, 75.8937))
        );
        assert_eq!(gazetteer.lookup("vijay nagar"), None);
        assert_eq!(gazetteer.lookup("Vijay"), None);
    }

    #[test]
    fn nearest_within_threshold() {
        let gazetteer = Gazetteer::default();

        assert_eq!(
            gazetteer.nearest(Coordinates::new(22.7520, 75.8935)),
            Some("Vijay Nagar")
        );
        assert_eq!(gazetteer.nearest(Coordinates::new(22.9, 75.7)), None);
    }

    #[test]
    fn nearest_threshold_is_inclusive() {
        let gazetteer = small();

        assert_eq!(gazetteer.nearest(Coordinates::new(0.5, 0.0)), Some("Origin"));
        assert_eq!(gazetteer.nearest(Coordinates::new(0.0, -0.5)), Some("Origin"));
        assert_eq!(gazetteer.nearest(Coordinates::new(0.0, 0.5000001)), None);
    }

    #[test]
    fn nearest_ties_go_to_first_entry() {
        assert_eq!(small().nearest(Coordinates::new(0.25, 0.0)), Some("Origin"));
    }

    #[test]
    fn find_in_ignores_case_and_keeps_catalog_order() {
        let gazetteer = Gazetteer::default();

        let place = gazetteer.find_in("somewhere near VIJAY NAGAR market").unwrap();
        assert_eq!(place.name, "Vijay Nagar");

        let place = gazetteer.find_in("opposite mr 10 petrol pump").unwrap();
        assert_eq!(place.name, "MR 10");

        assert!(gazetteer.find_in("Bhopal").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Gazetteer::new(
            vec![Place::new("Rajwada", 22.7196, 75.8577), Place::new("Rajwada", 0.0, 0.0)],
            DEFAULT_NEAREST_THRESHOLD,
        );

        assert!(result.is_err());
    }
}
