use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use routecast::entities::{BoundingBox, Coordinates, ServiceArea};
use routecast::error::{INVALID_INPUT, TRANSPORT_FAILURE};
use routecast::external::nominatim::NominatimClient;
use routecast::external::{Geocoder, SearchQuery, SearchScope};
use routecast::gazetteer::Gazetteer;
use routecast::resolver::{Resolver, Strategy};

fn client(server: &MockServer) -> NominatimClient {
    NominatimClient::new(server.uri(), "routecast-tests", Duration::from_secs(5)).unwrap()
}

fn indore() -> SearchScope {
    SearchScope {
        country_code: "in".into(),
        bounds: BoundingBox::new(22.5, 75.6, 23.0, 76.1),
    }
}

fn has_structured_params(request: &Request) -> bool {
    request
        .url
        .query_pairs()
        .any(|(key, _)| matches!(key.as_ref(), "city" | "state" | "country" | "street"))
}

#[tokio::test]
async fn scoped_search_uses_country_and_viewbox_filters() {
    let server = MockServer::start().await;

    // Nominatim answers 400 when structured filters are mixed with `q`.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(has_structured_params)
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Structured query parameters cannot be used together with 'q' parameter."
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Rajwada Palace"))
        .and(query_param("countrycodes", "in"))
        .and(query_param("viewbox", "75.6,23,76.1,22.5"))
        .and(query_param("bounded", "1"))
        .and(query_param("format", "json"))
        .and(header("accept-language", "en"))
        .and(|request: &Request| !has_structured_params(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "lat": "22.7187",
            "lon": "75.8553",
            "display_name": "Rajwada, Indore, Madhya Pradesh, India",
            "address": { "city": "Indore", "state": "Madhya Pradesh", "country": "India" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client(&server)
        .search(&SearchQuery::scoped("Rajwada Palace", indore()))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].coordinates, Coordinates::new(22.7187, 75.8553));
    assert_eq!(hits[0].region.as_deref(), Some("Madhya Pradesh"));
}

#[tokio::test]
async fn resolver_scoped_stage_matches_against_nominatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(has_structured_params)
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Annapurna"))
        .and(query_param("bounded", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "lat": "22.6942",
            "lon": "75.8553",
            "display_name": "Annapurna Temple, Indore, Madhya Pradesh, India",
            "address": { "state": "Madhya Pradesh" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = Resolver::new(
        Arc::new(Gazetteer::default()),
        Arc::new(client(&server)),
        ServiceArea::default(),
    );

    let resolved = resolver
        .attempt(Strategy::ScopedGeocode, "Annapurna")
        .await
        .unwrap();

    assert_eq!(resolved, Some(Coordinates::new(22.6942, 75.8553)));
}

#[tokio::test]
async fn unparseable_coordinates_are_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "north", "lon": "75.85", "display_name": "Broken" },
            { "lat": "22.72", "lon": "75.86", "display_name": "Fine" }
        ])))
        .mount(&server)
        .await;

    let hits = client(&server)
        .search(&SearchQuery::free("anything, Indore"))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name, "Fine");
    assert_eq!(hits[0].region, None);
}

#[tokio::test]
async fn reverse_with_nothing_there_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "22.5"))
        .and(query_param("lon", "75.6"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
        )
        .mount(&server)
        .await;

    let hit = client(&server)
        .reverse(Coordinates::new(22.5, 75.6))
        .await
        .unwrap();

    assert_eq!(hit, None);
}

#[tokio::test]
async fn reverse_returns_the_display_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lat": "22.7519",
            "lon": "75.8937",
            "display_name": "Vijay Nagar",
            "address": { "state": "Madhya Pradesh" }
        })))
        .mount(&server)
        .await;

    let hit = client(&server)
        .reverse(Coordinates::new(22.7519, 75.8937))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(hit.display_name, "Vijay Nagar");
}

#[tokio::test]
async fn upstream_errors_are_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "bad"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = client(&server);

    let err = geocoder.search(&SearchQuery::free("bad")).await.unwrap_err();
    assert!(err.is(INVALID_INPUT));

    let err = geocoder.search(&SearchQuery::free("down")).await.unwrap_err();
    assert!(err.is(TRANSPORT_FAILURE));
}
