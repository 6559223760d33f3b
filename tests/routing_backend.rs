use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routecast::entities::{Congestion, Coordinates, RouteRequest, TravelMode};
use routecast::error::{EMPTY_RESULT, TRANSPORT_FAILURE};
use routecast::external::routing::RoutingClient;
use routecast::external::RoutingBackend;

fn request() -> RouteRequest {
    let departure = NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(18, 15, 0))
        .unwrap();

    RouteRequest::new(
        Coordinates::new(22.7519, 75.8937),
        Coordinates::new(22.7193, 75.88),
        departure,
        TravelMode::Bike,
    )
}

fn client(server: &MockServer) -> RoutingClient {
    RoutingClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn posts_the_request_and_decodes_routes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/routes/"))
        .and(body_json(json!({
            "source": "22.7519,75.8937",
            "destination": "22.7193,75.88",
            "date_time": "2024-03-05T18:15:00",
            "travel_mode": "bike"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "route_name": "Route 1",
                "total_distance_km": 4.2,
                "total_time_min": 14.0,
                "segments": [{
                    "road_id": 17,
                    "latitude_start": 22.7519, "longitude_start": 75.8937,
                    "latitude_end": 22.7400, "longitude_end": 75.8900,
                    "length_m": 1400.0, "speed_kmh": 18.5,
                    "congestion_level": "red",
                    "travel_time_min": 4.5
                }]
            },
            {
                "route_name": "Route 2",
                "total_distance_km": 3.9,
                "total_time_min": 11.0,
                "recommended": true,
                "segments": [{
                    "latitude_start": 22.7519, "longitude_start": 75.8937,
                    "latitude_end": 22.7193, "longitude_end": 75.8800,
                    "length_m": 3900.0, "speed_kmh": 21.0,
                    "congestion_level": "low"
                }]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let routes = client(&server).fetch_routes(&request()).await.unwrap();

    assert_eq!(routes.len(), 2);
    assert!(!routes[0].recommended);
    assert!(routes[1].recommended);
    assert_eq!(routes[0].segments[0].congestion_level, Congestion::High);
    assert_eq!(routes[1].segments[0].congestion_level, Congestion::Low);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/routes/"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "model not loaded" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch_routes(&request()).await.unwrap_err();

    assert!(err.is(TRANSPORT_FAILURE));
    assert_eq!(err.message, "model not loaded");
}

#[tokio::test]
async fn failure_without_a_message_uses_the_generic_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/routes/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_routes(&request()).await.unwrap_err();

    assert!(err.is(TRANSPORT_FAILURE));
    assert_eq!(err.message, "Error fetching route");
}

#[tokio::test]
async fn zero_routes_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/routes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server).fetch_routes(&request()).await.unwrap_err();

    assert!(err.is(EMPTY_RESULT));
    assert_eq!(err.message, "No routes found");
}
