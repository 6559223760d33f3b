use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::entities::{BoundingBox, ServiceArea};
use crate::error::{config_error, Error};
use crate::gazetteer::DEFAULT_NEAREST_THRESHOLD;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub routing_backend_url: String,
    pub http_timeout: Duration,
    pub area: ServiceArea,
    pub nearest_threshold: f64,
    pub gazetteer_path: Option<PathBuf>,
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = ServiceArea::default();

        let area = ServiceArea {
            city: var_or("AREA_CITY", &defaults.city),
            region: var_or("AREA_REGION", &defaults.region),
            country: var_or("AREA_COUNTRY", &defaults.country),
            country_code: var_or("AREA_COUNTRY_CODE", &defaults.country_code).to_lowercase(),
            bounds: parse_var("AREA_BOUNDS", defaults.bounds)?,
        };

        let nearest_threshold = parse_var("NEAREST_THRESHOLD_DEG", DEFAULT_NEAREST_THRESHOLD)?;
        if !(nearest_threshold > 0.0) {
            return Err(config_error("NEAREST_THRESHOLD_DEG"));
        }

        Ok(Config {
            listen_addr: parse_var("LISTEN_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            geocoder_base_url: var_or("GEOCODER_BASE_URL", "https://nominatim.openstreetmap.org"),
            geocoder_user_agent: var_or(
                "GEOCODER_USER_AGENT",
                concat!("routecast/", env!("CARGO_PKG_VERSION")),
            ),
            routing_backend_url: var_or("ROUTING_BACKEND_URL", "http://localhost:8000"),
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30u64)?),
            area,
            nearest_threshold,
            gazetteer_path: env::var("GAZETTEER_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            session_idle: Duration::from_secs(parse_var("SESSION_IDLE_SECS", 1800u64)?),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, Error> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse::<T>().map_err(|_| config_error(key))
        }
        _ => Ok(default),
    }
}

#[test]
fn parse_var_falls_back_and_validates() {
    env::remove_var("ROUTECAST_TEST_TIMEOUT");
    assert_eq!(parse_var("ROUTECAST_TEST_TIMEOUT", 30u64).unwrap(), 30);

    env::set_var("ROUTECAST_TEST_TIMEOUT", "12");
    assert_eq!(parse_var("ROUTECAST_TEST_TIMEOUT", 30u64).unwrap(), 12);

    env::set_var("ROUTECAST_TEST_TIMEOUT", "soon");
    let err = parse_var("ROUTECAST_TEST_TIMEOUT", 30u64).unwrap_err();
    assert_eq!(err.message, "invalid configuration value for ROUTECAST_TEST_TIMEOUT");

    env::remove_var("ROUTECAST_TEST_TIMEOUT");
}

#[test]
fn bounds_parse_from_env() {
    env::set_var("ROUTECAST_TEST_BOUNDS", "22.6,75.7,22.9,76.0");
    let bounds = parse_var("ROUTECAST_TEST_BOUNDS", BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert_eq!(bounds, BoundingBox::new(22.6, 75.7, 22.9, 76.0));

    env::set_var("ROUTECAST_TEST_BOUNDS", "22.6,75.7");
    assert!(parse_var("ROUTECAST_TEST_BOUNDS", bounds).is_err());

    env::remove_var("ROUTECAST_TEST_BOUNDS");
}
