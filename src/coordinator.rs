//! Orchestration facade over the zones, graph, queue, index and trees.
//!
//! The [`Coordinator`] owns every structure and is the only place where
//! cross-entity rules live: referential checks on ids, stock reservation
//! before placement, and population bookkeeping when evacuations finish.
//! Mutating commands return [`Error`]; read-only queries keep the sentinel
//! conventions of the underlying structures.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    distribution::{Allocation, DistributionTree},
    domain::{
        Capability, Evacuation, Level, RescueTeam, Resource, ResourceKind, Route, RouteSnapshot,
        TeamStatus, TransitionError, TransportMode, User, Zone,
    },
    graph::RouteGraph,
    index::ResourceRouteIndex,
    queue::EvacuationQueue,
};

/// Failure of a coordinator command.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind, e.g. "zone".
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// An entity with the same id already exists.
    #[error("{kind} '{id}' already exists")]
    Duplicate {
        /// Entity kind, e.g. "route".
        kind: &'static str,
        /// The conflicting id.
        id: String,
    },

    /// A field failed validation.
    #[error("{0}")]
    Validation(String),

    /// A reservation or distribution asked for more than is on hand.
    #[error("requested {requested} units but only {available} are available")]
    Insufficient {
        /// Units asked for.
        requested: u32,
        /// Units on hand.
        available: u32,
    },

    /// An evacuation lifecycle transition was not permitted.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Aggregate counters over the whole scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    /// Registered zones.
    pub zones: usize,
    /// Zones currently critical.
    pub critical_zones: usize,
    /// Sum of affected populations.
    pub total_affected: u64,
    /// Registered routes.
    pub routes: usize,
    /// Registered resources.
    pub resources: usize,
    /// Registered rescue teams.
    pub teams: usize,
    /// Registered users.
    pub users: usize,
    /// Evacuations waiting in the queue.
    pub pending_evacuations: usize,
    /// Evacuations taken off the queue so far.
    pub processed_evacuations: usize,
    /// People still to be moved across pending and processed evacuations.
    pub people_to_evacuate: u64,
    /// People moved so far across processed evacuations.
    pub people_evacuated: u64,
    /// Mean wall-clock hours from planning to finish.
    pub mean_processing_hours: f64,
    /// Available stock per resource kind.
    pub stock_by_kind: BTreeMap<ResourceKind, u32>,
}

/// The planning core: all entities, all structures, all cross-entity rules.
#[derive(Debug, Default)]
pub struct Coordinator {
    zones: BTreeMap<String, Zone>,
    graph: RouteGraph,
    resources: ResourceRouteIndex,
    teams: BTreeMap<String, RescueTeam>,
    users: BTreeMap<String, User>,
    queue: EvacuationQueue,

    /// Evacuations taken off the queue, in processing order.
    processed: Vec<Evacuation>,

    trees: HashMap<String, DistributionTree>,
}

impl Coordinator {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- registration ----

    /// Registers a zone, mirroring it as a graph node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if the id is taken.
    pub fn add_zone(&mut self, zone: Zone) -> Result<(), Error> {
        if self.zones.contains_key(zone.id()) {
            return Err(Error::Duplicate {
                kind: "zone",
                id: zone.id().to_string(),
            });
        }
        self.graph.add_zone(zone.id());
        debug!(zone = zone.id(), "registered zone");
        self.zones.insert(zone.id().to_string(), zone);
        Ok(())
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the holding zone is unknown, or
    /// [`Error::Duplicate`] if the id is taken.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), Error> {
        self.require_zone(resource.zone())?;
        if !self.resources.insert(resource.clone()) {
            return Err(Error::Duplicate {
                kind: "resource",
                id: resource.id().to_string(),
            });
        }
        Ok(())
    }

    /// Registers a rescue team.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the team's station zone is unknown, or
    /// [`Error::Duplicate`] if the id is taken.
    pub fn add_team(&mut self, team: RescueTeam) -> Result<(), Error> {
        self.require_zone(team.location())?;
        if self.teams.contains_key(team.id()) {
            return Err(Error::Duplicate {
                kind: "team",
                id: team.id().to_string(),
            });
        }
        self.teams.insert(team.id().to_string(), team);
        Ok(())
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if the id is taken.
    pub fn add_user(&mut self, user: User) -> Result<(), Error> {
        if self.users.contains_key(&user.id) {
            return Err(Error::Duplicate {
                kind: "user",
                id: user.id.clone(),
            });
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    // ---- routing ----

    /// Creates a directed route between two registered zones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown endpoint,
    /// [`Error::Validation`] for a negative distance or travel time, and
    /// [`Error::Duplicate`] for a taken route id.
    #[instrument(skip(self))]
    pub fn connect_zones(
        &mut self,
        route_id: &str,
        origin: &str,
        destination: &str,
        distance: f64,
        travel_time: f64,
        mode: TransportMode,
    ) -> Result<Route, Error> {
        self.require_zone(origin)?;
        self.require_zone(destination)?;
        if distance < 0.0 || travel_time < 0.0 {
            return Err(Error::Validation(format!(
                "distance and travel time must be non-negative, got {distance} and {travel_time}"
            )));
        }

        let route = Route::new(route_id, origin, destination, distance, travel_time, mode);
        if !self.graph.add_route(route.clone()) {
            return Err(Error::Duplicate {
                kind: "route",
                id: route_id.to_string(),
            });
        }
        Ok(route)
    }

    /// Registers an already-built route between two registered zones.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Coordinator::connect_zones`].
    pub fn add_route(&mut self, route: Route) -> Result<(), Error> {
        self.require_zone(route.origin())?;
        self.require_zone(route.destination())?;
        if !self.graph.add_route(route.clone()) {
            return Err(Error::Duplicate {
                kind: "route",
                id: route.id().to_string(),
            });
        }
        Ok(())
    }

    /// Shortest path between two zones by cumulative distance, as the
    /// ordered zones along it. Empty if either endpoint is unknown or the
    /// destination is unreachable.
    #[must_use]
    pub fn shortest_path(&self, origin: &str, destination: &str) -> Vec<&Zone> {
        self.graph
            .shortest_path(origin, destination)
            .iter()
            .filter_map(|id| self.zones.get(id))
            .collect()
    }

    /// The quickest single route touched by any path between two zones.
    #[must_use]
    pub fn fastest_route(&self, origin: &str, destination: &str) -> Option<Route> {
        self.graph.fastest_route(origin, destination).cloned()
    }

    /// The lowest-risk single route touched by any path between two zones.
    #[must_use]
    pub fn safest_route(&self, origin: &str, destination: &str) -> Option<Route> {
        self.graph.safest_route(origin, destination).cloned()
    }

    /// Whether a direct route exists from one zone to another.
    #[must_use]
    pub fn exists_route(&self, origin: &str, destination: &str) -> bool {
        self.graph.exists_route(origin, destination)
    }

    /// Updates the risk level of a route.
    ///
    /// Pending evacuations planned over this route pick up the new risk the
    /// next time the queue is re-prioritized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown route.
    pub fn set_route_risk(&mut self, route_id: &str, risk: f64) -> Result<(), Error> {
        let route = self.graph.route_mut(route_id).ok_or_else(|| Error::NotFound {
            kind: "route",
            id: route_id.to_string(),
        })?;
        route.set_risk_level(risk);
        Ok(())
    }

    /// Updates the maximum capacity of a route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown route.
    pub fn set_route_capacity(&mut self, route_id: &str, max: u32) -> Result<(), Error> {
        let route = self.graph.route_mut(route_id).ok_or_else(|| Error::NotFound {
            kind: "route",
            id: route_id.to_string(),
        })?;
        route.set_max_capacity(max);
        Ok(())
    }

    // ---- evacuations ----

    /// Plans an evacuation between two registered zones and queues it.
    ///
    /// The fastest route between the zones (if any) is snapshotted into the
    /// evacuation; when `urgency` is not given it defaults to the origin
    /// zone's current risk level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown zone, [`Error::Validation`]
    /// when nobody is to be moved, and [`Error::Duplicate`] when the id
    /// clashes with a pending or processed evacuation.
    #[instrument(skip(self))]
    pub fn plan_evacuation(
        &mut self,
        id: &str,
        origin: &str,
        destination: &str,
        people: u32,
        urgency: Option<Level>,
        responsible: &str,
    ) -> Result<Evacuation, Error> {
        self.require_zone(origin)?;
        self.require_zone(destination)?;
        if people == 0 {
            return Err(Error::Validation(
                "an evacuation must move at least one person".to_string(),
            ));
        }
        if self.queue.contains(id) || self.processed.iter().any(|e| e.id() == id) {
            return Err(Error::Duplicate {
                kind: "evacuation",
                id: id.to_string(),
            });
        }

        let snapshot = self
            .graph
            .fastest_route(origin, destination)
            .map(RouteSnapshot::from);
        let urgency = urgency.unwrap_or_else(|| self.zones[origin].risk_level());

        let evacuation = Evacuation::new(id, origin, destination, people, urgency, responsible, snapshot);
        self.queue.push(evacuation.clone());
        self.reprioritize();
        Ok(evacuation)
    }

    /// Takes the highest-priority evacuation off the queue and starts it.
    ///
    /// Returns `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transition`] if the popped evacuation is no longer
    /// in the planned state.
    pub fn process_next(&mut self) -> Result<Option<Evacuation>, Error> {
        let Some(mut evacuation) = self.queue.pop() else {
            return Ok(None);
        };
        evacuation.start()?;
        debug!(evacuation = evacuation.id(), "processing evacuation");
        self.processed.push(evacuation.clone());
        Ok(Some(evacuation))
    }

    /// Completes a processed evacuation and moves the evacuated people
    /// between the zone populations.
    ///
    /// `evacuated` is clamped to the planned headcount and never lowered
    /// below what was already recorded. The origin loses the moved count,
    /// floored at zero; the destination gains the full moved count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no processed evacuation has the id and
    /// [`Error::Transition`] if it already reached a terminal state.
    pub fn complete_evacuation(&mut self, id: &str, evacuated: u32) -> Result<Evacuation, Error> {
        let evacuation = self
            .processed
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| Error::NotFound {
                kind: "evacuation",
                id: id.to_string(),
            })?;

        evacuation.complete()?;
        evacuation.update_progress(evacuated.max(evacuation.evacuated()));
        let moved = evacuation.evacuated();
        let result = evacuation.clone();

        let origin = result.origin().to_string();
        let destination = result.destination().to_string();

        if let Some(zone) = self.zones.get_mut(&origin) {
            let population = zone.affected_population();
            zone.set_affected_population(population - moved.min(population));
        }
        if let Some(zone) = self.zones.get_mut(&destination) {
            zone.set_affected_population(zone.affected_population() + moved);
        }

        Ok(result)
    }

    /// Re-grades the urgency of a pending evacuation and re-sorts the queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no pending evacuation has the id.
    pub fn set_evacuation_urgency(&mut self, id: &str, urgency: Level) -> Result<(), Error> {
        if !self.queue.update(id, |ev| ev.set_urgency(urgency)) {
            return Err(Error::NotFound {
                kind: "evacuation",
                id: id.to_string(),
            });
        }
        self.reprioritize();
        Ok(())
    }

    /// The next evacuation the queue would hand out.
    #[must_use]
    pub fn peek_next(&self) -> Option<&Evacuation> {
        self.queue.peek()
    }

    /// Re-scores every pending evacuation against the current entity state.
    ///
    /// Route snapshots are refreshed from the live graph first, so risk and
    /// distance changes made since planning flow into the new scores.
    pub fn reprioritize(&mut self) {
        let graph = &self.graph;
        self.queue.refresh(|evacuation| {
            let Some(id) = evacuation.route().map(|r| r.id.clone()) else {
                return;
            };
            if let Some(route) = graph.route(&id) {
                evacuation.set_route(Some(RouteSnapshot::from(route)));
            }
        });
    }

    /// Drops pending evacuations that reached a terminal state.
    pub fn purge_terminal(&mut self) {
        self.queue.purge_terminal();
    }

    /// Snapshot of the pending evacuations, in no particular order.
    #[must_use]
    pub fn pending_evacuations(&self) -> Vec<Evacuation> {
        self.queue.pending()
    }

    /// Pending evacuations whose current score is critical.
    #[must_use]
    pub fn critical_evacuations(&self) -> Vec<Evacuation> {
        self.queue.critical()
    }

    /// Evacuations taken off the queue, in processing order.
    #[must_use]
    pub fn processed_evacuations(&self) -> &[Evacuation] {
        &self.processed
    }

    // ---- resources and teams ----

    /// Reserves stock from a resource and places it at a zone.
    ///
    /// The placed stock becomes its own resource record with the id
    /// `"<resource>-<zone>"`; repeating the assignment restocks that record
    /// instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown resource or zone,
    /// [`Error::Validation`] for a zero quantity, and
    /// [`Error::Insufficient`] when the source cannot cover the quantity.
    pub fn assign_resource_to_zone(
        &mut self,
        resource_id: &str,
        zone_id: &str,
        quantity: u32,
    ) -> Result<Resource, Error> {
        self.require_zone(zone_id)?;
        if quantity == 0 {
            return Err(Error::Validation(
                "cannot assign zero units of a resource".to_string(),
            ));
        }

        let source = self
            .resources
            .get_mut(resource_id)
            .ok_or_else(|| Error::NotFound {
                kind: "resource",
                id: resource_id.to_string(),
            })?;

        let available = source.available();
        if !source.reserve(quantity) {
            return Err(Error::Insufficient {
                requested: quantity,
                available,
            });
        }
        let (name, kind, unit) = (
            source.name().to_string(),
            source.kind(),
            source.unit().to_string(),
        );

        let placed_id = format!("{resource_id}-{zone_id}");
        let placed = if let Some(placed) = self.resources.get_mut(&placed_id) {
            placed.restock(quantity);
            placed.clone()
        } else {
            let placed = Resource::new(&placed_id, name, kind, quantity, unit, zone_id);
            self.resources.insert(placed.clone());
            placed
        };
        debug!(resource = resource_id, zone = zone_id, quantity, "placed stock");

        Ok(placed)
    }

    /// Deploys a team to a zone and marks it on mission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown team or zone, and
    /// [`Error::Validation`] when the team is not deployable.
    pub fn assign_team_to_zone(&mut self, team_id: &str, zone_id: &str) -> Result<(), Error> {
        self.require_zone(zone_id)?;
        let team = self.teams.get_mut(team_id).ok_or_else(|| Error::NotFound {
            kind: "team",
            id: team_id.to_string(),
        })?;
        if !team.can_deploy() {
            return Err(Error::Validation(format!(
                "team '{team_id}' is not deployable ({}, {} staff)",
                team.status(),
                team.assigned_personnel()
            )));
        }
        team.deploy_to(zone_id);
        team.set_status(TeamStatus::OnMission);
        Ok(())
    }

    /// Associates a resource with the route that will carry it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown resource or route.
    pub fn associate_resource_with_route(
        &mut self,
        resource_id: &str,
        route_id: &str,
    ) -> Result<(), Error> {
        if self.graph.route(route_id).is_none() {
            return Err(Error::NotFound {
                kind: "route",
                id: route_id.to_string(),
            });
        }
        if !self.resources.associate(resource_id, route_id) {
            return Err(Error::NotFound {
                kind: "resource",
                id: resource_id.to_string(),
            });
        }
        Ok(())
    }

    /// Whether the resources assigned to a route can jointly cover
    /// `quantity` units.
    #[must_use]
    pub fn sufficient_for_route(&self, route_id: &str, quantity: u32) -> bool {
        self.resources.sufficient_for(route_id, quantity)
    }

    /// Available stock summed per resource kind.
    #[must_use]
    pub fn resource_totals_by_kind(&self) -> BTreeMap<ResourceKind, u32> {
        self.resources.totals_by_kind()
    }

    /// Resources whose computed priority is critical today, most urgent
    /// first.
    #[must_use]
    pub fn critical_resources(&self) -> Vec<&Resource> {
        self.resources
            .critical_resources(Utc::now().date_naive())
    }

    // ---- distribution trees ----

    /// Creates a distribution tree for a resource, rooted with `quantity`
    /// units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown resource and
    /// [`Error::Duplicate`] for a taken tree id.
    pub fn create_distribution_tree(
        &mut self,
        tree_id: &str,
        resource_id: &str,
        quantity: u32,
    ) -> Result<(), Error> {
        if !self.resources.contains(resource_id) {
            return Err(Error::NotFound {
                kind: "resource",
                id: resource_id.to_string(),
            });
        }
        if self.trees.contains_key(tree_id) {
            return Err(Error::Duplicate {
                kind: "distribution tree",
                id: tree_id.to_string(),
            });
        }

        let mut tree = DistributionTree::new();
        tree.create_root(resource_id, quantity);
        self.trees.insert(tree_id.to_string(), tree);
        Ok(())
    }

    /// Adds a demand node to a distribution tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown tree and
    /// [`Error::Duplicate`] for a taken node id.
    pub fn add_distribution_node(
        &mut self,
        tree_id: &str,
        node_id: &str,
        quantity: u32,
        parent_id: &str,
        priority: u32,
    ) -> Result<(), Error> {
        let tree = self.trees.get_mut(tree_id).ok_or_else(|| Error::NotFound {
            kind: "distribution tree",
            id: tree_id.to_string(),
        })?;
        let resource = tree
            .root()
            .map(|root| root.resource().to_string())
            .unwrap_or_default();
        if !tree.add_node(node_id, &resource, quantity, parent_id, priority) {
            return Err(Error::Duplicate {
                kind: "distribution node",
                id: node_id.to_string(),
            });
        }
        Ok(())
    }

    /// Total stock reachable from a tree's root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown tree.
    pub fn distribution_total(&self, tree_id: &str) -> Result<u32, Error> {
        self.trees
            .get(tree_id)
            .map(DistributionTree::total_quantity)
            .ok_or_else(|| Error::NotFound {
                kind: "distribution tree",
                id: tree_id.to_string(),
            })
    }

    /// Greedily distributes `requested` units across a tree's nodes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown tree and
    /// [`Error::Insufficient`] when the tree cannot cover the request.
    pub fn distribute(&mut self, tree_id: &str, requested: u32) -> Result<Vec<Allocation>, Error> {
        let tree = self.trees.get_mut(tree_id).ok_or_else(|| Error::NotFound {
            kind: "distribution tree",
            id: tree_id.to_string(),
        })?;

        let available = tree.total_quantity();
        let allocations = tree.distribute(requested);
        if allocations.is_empty() && requested > 0 {
            return Err(Error::Insufficient {
                requested,
                available,
            });
        }
        Ok(allocations)
    }

    /// Looks up a distribution tree by id.
    #[must_use]
    pub fn distribution_tree(&self, tree_id: &str) -> Option<&DistributionTree> {
        self.trees.get(tree_id)
    }

    // ---- queries ----

    /// Looks up a zone by id.
    #[must_use]
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// All zones, ordered by id.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Looks up a team by id.
    #[must_use]
    pub fn team(&self, id: &str) -> Option<&RescueTeam> {
        self.teams.get(id)
    }

    /// All teams, ordered by id.
    pub fn teams(&self) -> impl Iterator<Item = &RescueTeam> {
        self.teams.values()
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// All users, ordered by id.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Read access to the resource index.
    #[must_use]
    pub fn resources(&self) -> &ResourceRouteIndex {
        &self.resources
    }

    /// Read access to the routing graph.
    #[must_use]
    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Whether a user holds a capability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown user.
    pub fn can(&self, user_id: &str, capability: Capability) -> Result<bool, Error> {
        self.users
            .get(user_id)
            .map(|user| user.can(capability))
            .ok_or_else(|| Error::NotFound {
                kind: "user",
                id: user_id.to_string(),
            })
    }

    /// The `n` most critical zones: highest risk first, ties broken by the
    /// larger affected population.
    #[must_use]
    pub fn top_critical_zones(&self, n: usize) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self.zones.values().collect();
        zones.sort_by_key(|z| std::cmp::Reverse((z.risk_level(), z.affected_population())));
        zones.truncate(n);
        zones
    }

    /// Aggregate counters over the whole scenario.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let pending = self.queue.pending();
        Statistics {
            zones: self.zones.len(),
            critical_zones: self.zones.values().filter(|z| z.is_critical()).count(),
            total_affected: self
                .zones
                .values()
                .map(|z| u64::from(z.affected_population()))
                .sum(),
            routes: self.graph.route_count(),
            resources: self.resources.len(),
            teams: self.teams.len(),
            users: self.users.len(),
            pending_evacuations: pending.len(),
            processed_evacuations: self.processed.len(),
            people_to_evacuate: pending
                .iter()
                .chain(self.processed.iter())
                .map(|e| u64::from(e.to_evacuate()))
                .sum(),
            people_evacuated: self
                .processed
                .iter()
                .map(|e| u64::from(e.evacuated()))
                .sum(),
            mean_processing_hours: self.queue.mean_processing_hours(),
            stock_by_kind: self.resources.totals_by_kind(),
        }
    }

    // ---- persistence hooks ----

    /// Re-queues an evacuation restored from storage, keeping its snapshot
    /// and progress.
    pub(crate) fn restore_pending(&mut self, evacuation: Evacuation) {
        self.queue.push(evacuation);
    }

    /// Re-adds a processed evacuation restored from storage.
    pub(crate) fn restore_processed(&mut self, evacuation: Evacuation) {
        self.processed.push(evacuation);
    }

    /// Re-adds a distribution tree restored from storage.
    pub(crate) fn restore_tree(&mut self, id: String, tree: DistributionTree) {
        self.trees.insert(id, tree);
    }

    /// All distribution trees, keyed by id.
    pub(crate) fn trees(&self) -> &HashMap<String, DistributionTree> {
        &self.trees
    }

    fn require_zone(&self, zone_id: &str) -> Result<(), Error> {
        if self.zones.contains_key(zone_id) {
            Ok(())
        } else {
            Err(Error::NotFound {
                kind: "zone",
                id: zone_id.to_string(),
            })
        }
    }
}
