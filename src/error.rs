use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

pub const INVALID_INPUT: i32 = 101;
pub const OUT_OF_BOUNDS: i32 = 102;
pub const UNRESOLVED_LOCATION: i32 = 103;
pub const EMPTY_RESULT: i32 = 104;
pub const TRANSPORT_FAILURE: i32 = 105;
pub const SUPERSEDED: i32 = 106;
pub const NOT_FOUND: i32 = 107;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is(&self, code: i32) -> bool {
        self.code == code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        decode_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            EMPTY_RESULT | NOT_FOUND => (StatusCode::NOT_FOUND, self.message.as_str()),
            TRANSPORT_FAILURE => (StatusCode::BAD_GATEWAY, self.message.as_str()),
            SUPERSEDED => (StatusCode::CONFLICT, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: INVALID_INPUT,
        message: message.into(),
    }
}

pub fn out_of_bounds_error(input: &str) -> Error {
    Error {
        code: OUT_OF_BOUNDS,
        message: format!("{} is outside the service area", input),
    }
}

pub fn unresolved_location_error(input: &str) -> Error {
    Error {
        code: UNRESOLVED_LOCATION,
        message: format!("{} not found", input),
    }
}

pub fn empty_result_error() -> Error {
    Error {
        code: EMPTY_RESULT,
        message: "No routes found".into(),
    }
}

/// Upstream unreachable or answered with a non-2xx status. The upstream's own
/// message is kept when it sent one.
pub fn transport_error(message: Option<String>) -> Error {
    Error {
        code: TRANSPORT_FAILURE,
        message: message.unwrap_or_else(|| "failed to reach upstream service".into()),
    }
}

pub fn superseded_error() -> Error {
    Error {
        code: SUPERSEDED,
        message: "request superseded by a newer one".into(),
    }
}

pub fn not_found_error(what: &str) -> Error {
    Error {
        code: NOT_FOUND,
        message: format!("{} not found", what),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn config_error(key: &str) -> Error {
    Error {
        code: 2,
        message: format!("invalid configuration value for {}", key),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::debug!("transport error: {}", err);
    transport_error(None)
}

pub fn decode_error<T: Debug>(err: T) -> Error {
    tracing::debug!("decode error: {:?}", err);
    Error {
        code: 3,
        message: "decode error".into(),
    }
}

#[test]
fn internal_errors_hide_their_message() {
    use tokio_test::block_on;

    let response = config_error("AREA_BOUNDS").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = block_on(hyper::body::to_bytes(response.into_body())).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"], "Internal Server Error");
    assert_eq!(value["code"], 2);
}

#[test]
fn transport_errors_keep_backend_message() {
    let err = transport_error(Some("No route found".into()));
    assert_eq!(err.message, "No route found");
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

    assert_eq!(transport_error(None).message, "failed to reach upstream service");
}

#[test]
fn unresolved_location_names_the_input() {
    let err = unresolved_location_error("Atlantis");
    assert!(err.is(UNRESOLVED_LOCATION));
    assert_eq!(err.message, "Atlantis not found");
}
