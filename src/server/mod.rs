mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::DynAPI;
use crate::error::{transport_error, Error};
use crate::server::handlers::{places, sessions};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/places", get(places::list))
        .route("/places/nearest", get(places::nearest))
        .route("/places/resolve", post(places::resolve))
        .route("/places/describe", get(places::describe))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:id", get(sessions::find).delete(sessions::delete))
        .route("/sessions/:id/fields/:field", put(sessions::edit_field))
        .route("/sessions/:id/focus", put(sessions::focus))
        .route("/sessions/:id/map_click", post(sessions::map_click))
        .route("/sessions/:id/position", post(sessions::position))
        .route("/sessions/:id/preferences", put(sessions::preferences))
        .route("/sessions/:id/routes", post(sessions::request_routes))
        .route("/sessions/:id/selection", put(sessions::select))
        .layer(Extension(api))
}

pub async fn serve(api: DynAPI, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| transport_error(Some(err.to_string())))
}
