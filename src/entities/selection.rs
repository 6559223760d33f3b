use serde::{Deserialize, Serialize};

use crate::entities::Route;

/// Candidate routes of the current query and the one currently highlighted.
///
/// `active` is `Some` exactly when `routes` is non-empty, and always indexes
/// into `routes`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    routes: Vec<Route>,
    active: Option<usize>,
}

impl RouteSelection {
    /// Replaces the candidate list. The first recommended route becomes active,
    /// falling back to the first route.
    pub fn set_routes(&mut self, routes: Vec<Route>) {
        self.active = if routes.is_empty() {
            None
        } else {
            Some(routes.iter().position(|r| r.recommended).unwrap_or(0))
        };
        self.routes = routes;
    }

    /// Makes `index` the active route. Out of range indexes are ignored and
    /// reported as `false`.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.routes.len() {
            return false;
        }

        self.active = Some(index);
        true
    }

    pub fn clear(&mut self) {
        self.routes.clear();
        self.active = None;
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.active.and_then(|i| self.routes.get(i))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::route;
    use crate::entities::Congestion::*;

    #[test]
    fn empty_selection_has_no_active_route() {
        let mut selection = RouteSelection::default();
        assert!(selection.active_route().is_none());

        selection.set_routes(Vec::new());
        assert!(selection.active_route().is_none());
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn recommended_route_becomes_active() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![route("r0", false, &[Low]), route("r1", true, &[High])]);

        assert_eq!(selection.active_index(), Some(1));
        assert_eq!(selection.active_route().unwrap().route_name, "r1");
    }

    #[test]
    fn first_route_is_active_without_recommendation() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![route("r0", false, &[Low]), route("r1", false, &[High])]);

        assert_eq!(selection.active_index(), Some(0));
    }

    #[test]
    fn first_recommended_route_wins() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![
            route("r0", false, &[Low]),
            route("r1", true, &[Low]),
            route("r2", true, &[Low]),
        ]);

        assert_eq!(selection.active_index(), Some(1));
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![route("r0", false, &[Low]), route("r1", false, &[Low])]);

        assert!(!selection.select(2));
        assert_eq!(selection.active_index(), Some(0));

        assert!(selection.select(1));
        assert_eq!(selection.active_index(), Some(1));

        let mut empty = RouteSelection::default();
        assert!(!empty.select(0));
        assert_eq!(empty.active_index(), None);
    }

    #[test]
    fn set_routes_replaces_instead_of_merging() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![route("r0", false, &[Low]), route("r1", true, &[Low])]);
        selection.set_routes(vec![route("s0", false, &[Medium])]);

        assert_eq!(selection.routes().len(), 1);
        assert_eq!(selection.active_index(), Some(0));
        assert_eq!(selection.active_route().unwrap().route_name, "s0");
    }

    #[test]
    fn three_routes_with_second_recommended() {
        let mut selection = RouteSelection::default();
        selection.set_routes(vec![
            route("Shortest Distance", false, &[Low, Low]),
            route("Alternative Route 1", true, &[Low, Medium, High, Low, Low, Low, Low]),
            route("Alternative Route 2", false, &[High]),
        ]);

        let active = selection.active_route().unwrap();
        assert_eq!(selection.active_index(), Some(1));
        // round(100 * 2 / 7) = 29
        assert_eq!(active.congestion_percentage(), 29);
    }
}
