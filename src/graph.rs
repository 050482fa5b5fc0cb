//! Directed routing graph over zones.
//!
//! The [`RouteGraph`] knows nothing about populations or evacuations. Nodes
//! are zone ids, edges are [`Route`]s, and all queries answer with sentinels
//! (empty sequences, `None`, `false`) rather than errors when an endpoint is
//! unknown or unreachable — callers must treat "empty" as unreachable, not
//! as a failure.

use std::collections::HashMap;

use petgraph::{
    algo::{all_simple_paths, astar},
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
    Direction,
};
use tracing::debug;

use crate::domain::Route;

/// A directed graph of zones connected by routes.
///
/// Nodes and edges are keyed by their string ids; inserting an edge
/// auto-creates both endpoint nodes. Duplicate ids are rejected as no-ops,
/// never overwrites.
#[derive(Debug, Default)]
pub struct RouteGraph {
    graph: DiGraph<String, Route>,

    /// Zone id to node index.
    zones: HashMap<String, NodeIndex>,

    /// Route id to edge index.
    routes: HashMap<String, EdgeIndex>,
}

impl RouteGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a zone node. Returns `false` if the zone was already present.
    pub fn add_zone(&mut self, zone_id: &str) -> bool {
        if self.zones.contains_key(zone_id) {
            return false;
        }
        let index = self.graph.add_node(zone_id.to_string());
        self.zones.insert(zone_id.to_string(), index);
        true
    }

    /// Adds a route edge, auto-creating both endpoint nodes if absent.
    ///
    /// Returns `false` if a route with the same id already exists.
    pub fn add_route(&mut self, route: Route) -> bool {
        if self.routes.contains_key(route.id()) {
            return false;
        }

        self.add_zone(route.origin());
        self.add_zone(route.destination());

        let origin = self.zones[route.origin()];
        let destination = self.zones[route.destination()];

        debug!(
            route = route.id(),
            origin = route.origin(),
            destination = route.destination(),
            "adding route edge"
        );

        let id = route.id().to_string();
        let edge = self.graph.add_edge(origin, destination, route);
        self.routes.insert(id, edge);
        true
    }

    /// Whether a zone node exists.
    #[must_use]
    pub fn contains_zone(&self, zone_id: &str) -> bool {
        self.zones.contains_key(zone_id)
    }

    /// Number of zone nodes.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of route edges.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Looks up a route by id.
    #[must_use]
    pub fn route(&self, route_id: &str) -> Option<&Route> {
        let edge = self.routes.get(route_id)?;
        self.graph.edge_weight(*edge)
    }

    /// Looks up a route by id for mutation (capacity and risk updates).
    pub fn route_mut(&mut self, route_id: &str) -> Option<&mut Route> {
        let edge = self.routes.get(route_id)?;
        self.graph.edge_weight_mut(*edge)
    }

    /// Iterates over all routes.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.graph.edge_weights()
    }

    /// Iterates over all zone ids.
    pub fn zone_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// All routes leaving a zone. Empty if the zone is unknown.
    #[must_use]
    pub fn routes_from(&self, zone_id: &str) -> Vec<&Route> {
        self.directed_routes(zone_id, Direction::Outgoing)
    }

    /// All routes arriving at a zone. Empty if the zone is unknown.
    #[must_use]
    pub fn routes_into(&self, zone_id: &str) -> Vec<&Route> {
        self.directed_routes(zone_id, Direction::Incoming)
    }

    fn directed_routes(&self, zone_id: &str, direction: Direction) -> Vec<&Route> {
        let Some(&index) = self.zones.get(zone_id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(index, direction)
            .map(|edge| edge.weight())
            .collect()
    }

    /// Whether a direct edge exists from `origin_id` to `destination_id`.
    ///
    /// O(out-degree) adjacency lookup; unknown endpoints yield `false`.
    #[must_use]
    pub fn exists_route(&self, origin_id: &str, destination_id: &str) -> bool {
        let (Some(&origin), Some(&destination)) =
            (self.zones.get(origin_id), self.zones.get(destination_id))
        else {
            return false;
        };
        self.graph.edges(origin).any(|e| e.target() == destination)
    }

    /// Shortest path by cumulative distance, as the ordered sequence of zone
    /// ids from origin to destination.
    ///
    /// Dijkstra relaxation with a min-priority frontier keyed by running
    /// distance; ties are broken arbitrarily. Returns an empty sequence when
    /// either endpoint is unknown or no path exists.
    #[must_use]
    pub fn shortest_path(&self, origin_id: &str, destination_id: &str) -> Vec<String> {
        let (Some(&origin), Some(&destination)) =
            (self.zones.get(origin_id), self.zones.get(destination_id))
        else {
            return Vec::new();
        };

        // astar with a zero estimate degenerates to Dijkstra.
        let Some((_, path)) = astar(
            &self.graph,
            origin,
            |node| node == destination,
            |edge| edge.weight().distance(),
            |_| 0.0,
        ) else {
            return Vec::new();
        };

        path.into_iter()
            .map(|node| self.graph[node].clone())
            .collect()
    }

    /// Exhaustively enumerates every simple (loop-free) path from origin to
    /// destination, each as an ordered sequence of routes.
    ///
    /// Depth-first enumeration is exponential in the worst case on dense
    /// graphs. Networks here are tens of zones, where this is fine; revisit
    /// before pointing it at anything larger. Where two zones are connected
    /// by parallel edges, the first edge found represents the hop.
    #[must_use]
    pub fn all_paths(&self, origin_id: &str, destination_id: &str) -> Vec<Vec<&Route>> {
        let (Some(&origin), Some(&destination)) =
            (self.zones.get(origin_id), self.zones.get(destination_id))
        else {
            return Vec::new();
        };

        all_simple_paths::<Vec<NodeIndex>, _>(&self.graph, origin, destination, 0, None)
            .filter_map(|nodes| {
                nodes
                    .windows(2)
                    .map(|pair| {
                        self.graph
                            .edges_connecting(pair[0], pair[1])
                            .next()
                            .map(|edge| edge.weight())
                    })
                    .collect()
            })
            .collect()
    }

    /// The single route with the lowest estimated travel time among all
    /// edges touched by [`RouteGraph::all_paths`].
    #[must_use]
    pub fn fastest_route(&self, origin_id: &str, destination_id: &str) -> Option<&Route> {
        self.all_paths(origin_id, destination_id)
            .into_iter()
            .flatten()
            .min_by(|a, b| a.travel_time().total_cmp(&b.travel_time()))
    }

    /// The single route with the lowest risk level among all edges touched
    /// by [`RouteGraph::all_paths`].
    #[must_use]
    pub fn safest_route(&self, origin_id: &str, destination_id: &str) -> Option<&Route> {
        self.all_paths(origin_id, destination_id)
            .into_iter()
            .flatten()
            .min_by(|a, b| a.risk_level().total_cmp(&b.risk_level()))
    }
}

#[cfg(test)]
mod tests {
    use super::RouteGraph;
    use crate::domain::{Route, TransportMode};

    fn route(id: &str, origin: &str, destination: &str, distance: f64, time: f64) -> Route {
        Route::new(id, origin, destination, distance, time, TransportMode::Land)
    }

    /// A diamond: A -> B -> D and A -> C -> D, plus a slow direct A -> D.
    fn diamond() -> RouteGraph {
        let mut graph = RouteGraph::new();
        assert!(graph.add_route(route("AB", "A", "B", 10.0, 1.0)));
        assert!(graph.add_route(route("BD", "B", "D", 10.0, 1.0)));
        assert!(graph.add_route(route("AC", "A", "C", 5.0, 4.0)));
        assert!(graph.add_route(route("CD", "C", "D", 5.0, 4.0)));
        assert!(graph.add_route(route("AD", "A", "D", 50.0, 0.5)));
        graph
    }

    #[test]
    fn edges_auto_create_their_endpoints() {
        let graph = diamond();
        assert_eq!(graph.zone_count(), 4);
        assert_eq!(graph.route_count(), 5);
        assert!(graph.contains_zone("C"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut graph = diamond();
        assert!(!graph.add_zone("A"));
        assert!(!graph.add_route(route("AB", "A", "B", 99.0, 99.0)));
        assert!((graph.route("AB").unwrap().distance() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shortest_path_minimises_cumulative_distance() {
        let graph = diamond();
        // A->C->D totals 10, beating A->B->D (20) and A->D (50).
        assert_eq!(graph.shortest_path("A", "D"), vec!["A", "C", "D"]);
    }

    #[test]
    fn shortest_path_agrees_with_exhaustive_enumeration() {
        let graph = diamond();

        let best_by_enumeration = graph
            .all_paths("A", "D")
            .into_iter()
            .map(|path| path.iter().map(|r| r.distance()).sum::<f64>())
            .min_by(f64::total_cmp)
            .unwrap();

        let path = graph.shortest_path("A", "D");
        let dijkstra_total: f64 = path
            .windows(2)
            .map(|pair| {
                graph
                    .routes_from(&pair[0])
                    .into_iter()
                    .find(|r| r.destination() == pair[1])
                    .unwrap()
                    .distance()
            })
            .sum();

        assert!((dijkstra_total - best_by_enumeration).abs() < f64::EPSILON);
    }

    #[test]
    fn unreachable_and_unknown_pairs_yield_empty() {
        let mut graph = diamond();
        graph.add_zone("ISLAND");

        assert!(graph.shortest_path("D", "A").is_empty()); // edges are directed
        assert!(graph.shortest_path("A", "ISLAND").is_empty());
        assert!(graph.shortest_path("A", "NOWHERE").is_empty());
        assert!(graph.all_paths("NOWHERE", "A").is_empty());
        assert!(graph.fastest_route("A", "NOWHERE").is_none());
        assert!(!graph.exists_route("A", "NOWHERE"));
    }

    #[test]
    fn all_paths_finds_every_simple_path() {
        let graph = diamond();
        let paths = graph.all_paths("A", "D");
        assert_eq!(paths.len(), 3);

        let mut ids: Vec<Vec<&str>> = paths
            .iter()
            .map(|path| path.iter().map(|r| r.id()).collect())
            .collect();
        ids.sort();
        assert_eq!(
            ids,
            vec![vec!["AB", "BD"], vec!["AC", "CD"], vec!["AD"]]
        );
    }

    #[test]
    fn fastest_route_is_the_quickest_touched_edge() {
        let graph = diamond();
        assert_eq!(graph.fastest_route("A", "D").unwrap().id(), "AD");
    }

    #[test]
    fn safest_route_is_the_lowest_risk_touched_edge() {
        let mut graph = diamond();
        graph.route_mut("AB").unwrap().set_risk_level(0.9);
        graph.route_mut("BD").unwrap().set_risk_level(0.8);
        graph.route_mut("AC").unwrap().set_risk_level(0.4);
        graph.route_mut("CD").unwrap().set_risk_level(0.6);
        graph.route_mut("AD").unwrap().set_risk_level(0.2);

        assert_eq!(graph.safest_route("A", "D").unwrap().id(), "AD");
    }

    #[test]
    fn adjacency_is_directional() {
        let graph = diamond();
        assert!(graph.exists_route("A", "B"));
        assert!(!graph.exists_route("B", "A"));
        assert_eq!(graph.routes_from("A").len(), 3);
        assert_eq!(graph.routes_into("D").len(), 3);
    }
}
