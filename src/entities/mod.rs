mod area;
mod location;
mod place;
mod query;
mod route;
mod selection;
mod session;

pub use area::ServiceArea;
pub use location::{ActiveField, BoundingBox, Coordinates, FieldInput};
pub use place::Place;
pub use query::{parse_departure, RouteQuery, RouteRequest};
pub use route::{Congestion, Route, RouteSegment, TravelMode};
pub use selection::RouteSelection;
pub use session::{PendingRequest, RequestStatus, RouteSummary, Session, SessionSnapshot};

#[cfg(test)]
pub(crate) use route::fixtures;
