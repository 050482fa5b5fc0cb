//! Bidirectional index between resources and the routes that carry them.
//!
//! The index owns the [`Resource`] records and keeps two association maps in
//! lockstep: resource id to route ids, and route id to resource ids. Removal
//! scrubs both sides so no association ever dangles.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Resource, ResourceKind};

/// Computed priority at or above which a resource counts as critical.
pub const CRITICAL_RESOURCE_PRIORITY: u32 = 7;

/// Registry of resources with resource-to-route associations.
///
/// Associations are recorded as given: associating the same pair twice
/// accumulates a second entry on both sides, and callers that care about
/// multiplicity must deduplicate themselves.
#[derive(Debug, Default)]
pub struct ResourceRouteIndex {
    resources: HashMap<String, Resource>,
    routes_by_resource: HashMap<String, Vec<String>>,
    resources_by_route: HashMap<String, Vec<String>>,
}

impl ResourceRouteIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource. Returns `false` if the id is already taken.
    pub fn insert(&mut self, resource: Resource) -> bool {
        if self.resources.contains_key(resource.id()) {
            return false;
        }
        debug!(resource = resource.id(), "registering resource");
        self.resources.insert(resource.id().to_string(), resource);
        true
    }

    /// Looks up a resource by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Looks up a resource by id for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Resource> {
        self.resources.get_mut(id)
    }

    /// Whether a resource with the given id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the index holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates over all resources, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Associates a resource with a route, on both sides of the index.
    ///
    /// Returns `false` when the resource is unknown; the route id is taken
    /// on trust since routes live in the graph, not here.
    pub fn associate(&mut self, resource_id: &str, route_id: &str) -> bool {
        if !self.resources.contains_key(resource_id) {
            return false;
        }
        self.routes_by_resource
            .entry(resource_id.to_string())
            .or_default()
            .push(route_id.to_string());
        self.resources_by_route
            .entry(route_id.to_string())
            .or_default()
            .push(resource_id.to_string());
        true
    }

    /// Ids of the routes a resource is assigned to.
    #[must_use]
    pub fn routes_of(&self, resource_id: &str) -> &[String] {
        self.routes_by_resource
            .get(resource_id)
            .map_or(&[], Vec::as_slice)
    }

    /// The resources assigned to a route.
    #[must_use]
    pub fn resources_of(&self, route_id: &str) -> Vec<&Resource> {
        self.resources_by_route
            .get(route_id)
            .map_or_else(Vec::new, |ids| {
                ids.iter().filter_map(|id| self.resources.get(id)).collect()
            })
    }

    /// All recorded associations as `(resource id, route id)` pairs.
    #[must_use]
    pub fn associations(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .routes_by_resource
            .iter()
            .flat_map(|(resource, routes)| {
                routes
                    .iter()
                    .map(move |route| (resource.clone(), route.clone()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// All resources of the given kind.
    #[must_use]
    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&Resource> {
        self.resources
            .values()
            .filter(|r| r.kind() == kind)
            .collect()
    }

    /// All resources that can be drawn from right now.
    #[must_use]
    pub fn available(&self) -> Vec<&Resource> {
        self.resources
            .values()
            .filter(|r| r.is_available())
            .collect()
    }

    /// All resources stocked at the given zone.
    #[must_use]
    pub fn by_location(&self, zone_id: &str) -> Vec<&Resource> {
        self.resources
            .values()
            .filter(|r| r.zone() == zone_id)
            .collect()
    }

    /// Available stock summed per kind.
    #[must_use]
    pub fn totals_by_kind(&self) -> BTreeMap<ResourceKind, u32> {
        let mut totals = BTreeMap::new();
        for resource in self.resources.values() {
            *totals.entry(resource.kind()).or_insert(0) += resource.available();
        }
        totals
    }

    /// Resources whose computed priority as of `today` is critical, sorted
    /// most urgent first.
    #[must_use]
    pub fn critical_resources(&self, today: NaiveDate) -> Vec<&Resource> {
        let mut critical: Vec<&Resource> = self
            .resources
            .values()
            .filter(|r| r.computed_priority(today) >= CRITICAL_RESOURCE_PRIORITY)
            .collect();
        critical.sort_by_key(|r| std::cmp::Reverse(r.computed_priority(today)));
        critical
    }

    /// Whether the resources assigned to a route can jointly cover
    /// `quantity` units from their available stock.
    #[must_use]
    pub fn sufficient_for(&self, route_id: &str, quantity: u32) -> bool {
        self.resources_of(route_id)
            .iter()
            .map(|r| r.available())
            .sum::<u32>()
            >= quantity
    }

    /// Sets a resource's available stock to an absolute value, capped at its
    /// total, keeping the status in step. Returns `false` for an unknown id.
    pub fn update_quantity(&mut self, resource_id: &str, available: u32) -> bool {
        let Some(resource) = self.resources.get_mut(resource_id) else {
            return false;
        };
        let current = resource.available();
        if available > current {
            resource.release(available - current);
        } else if available < current {
            resource.reserve(current - available);
        }
        true
    }

    /// Unregisters a resource and scrubs its associations from both sides.
    ///
    /// Returns the removed record, or `None` if the id was unknown.
    pub fn remove(&mut self, resource_id: &str) -> Option<Resource> {
        let resource = self.resources.remove(resource_id)?;

        if let Some(routes) = self.routes_by_resource.remove(resource_id) {
            for route in routes {
                if let Some(ids) = self.resources_by_route.get_mut(&route) {
                    ids.retain(|id| id != resource_id);
                    if ids.is_empty() {
                        self.resources_by_route.remove(&route);
                    }
                }
            }
        }

        debug!(resource = resource_id, "unregistered resource");
        Some(resource)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ResourceRouteIndex;
    use crate::domain::{Resource, ResourceKind};

    fn index() -> ResourceRouteIndex {
        let mut index = ResourceRouteIndex::new();
        assert!(index.insert(Resource::new(
            "R1",
            "Bottled water",
            ResourceKind::Food,
            1000,
            "litres",
            "Z1"
        )));
        assert!(index.insert(Resource::new(
            "R2",
            "Bandages",
            ResourceKind::Medicine,
            300,
            "boxes",
            "Z1"
        )));
        assert!(index.insert(Resource::new(
            "R3",
            "Generators",
            ResourceKind::Equipment,
            12,
            "units",
            "Z2"
        )));
        index
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut index = index();
        assert!(!index.insert(Resource::new(
            "R1",
            "Rice",
            ResourceKind::Food,
            50,
            "kg",
            "Z9"
        )));
        assert_eq!(index.get("R1").unwrap().name(), "Bottled water");
    }

    #[test]
    fn associations_are_bidirectional() {
        let mut index = index();
        assert!(index.associate("R1", "ROUTE-A"));
        assert!(index.associate("R2", "ROUTE-A"));
        assert!(index.associate("R1", "ROUTE-B"));

        assert_eq!(index.routes_of("R1"), ["ROUTE-A", "ROUTE-B"]);
        let mut on_a: Vec<&str> = index
            .resources_of("ROUTE-A")
            .iter()
            .map(|r| r.id())
            .collect();
        on_a.sort_unstable();
        assert_eq!(on_a, ["R1", "R2"]);
    }

    #[test]
    fn unknown_resource_cannot_be_associated() {
        let mut index = index();
        assert!(!index.associate("NOPE", "ROUTE-A"));
        assert!(index.resources_of("ROUTE-A").is_empty());
    }

    #[test]
    fn duplicate_associations_accumulate() {
        let mut index = index();
        assert!(index.associate("R1", "ROUTE-A"));
        assert!(index.associate("R1", "ROUTE-A"));
        assert_eq!(index.routes_of("R1").len(), 2);
        assert_eq!(index.resources_of("ROUTE-A").len(), 2);
    }

    #[test]
    fn remove_scrubs_both_sides() {
        let mut index = index();
        index.associate("R1", "ROUTE-A");
        index.associate("R2", "ROUTE-A");

        let removed = index.remove("R1").unwrap();
        assert_eq!(removed.id(), "R1");
        assert!(index.get("R1").is_none());
        assert!(index.routes_of("R1").is_empty());

        let remaining: Vec<&str> = index
            .resources_of("ROUTE-A")
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(remaining, ["R2"]);
        assert!(index.remove("R1").is_none());
    }

    #[test]
    fn queries_filter_by_kind_zone_and_availability() {
        let mut index = index();
        index.get_mut("R3").unwrap().reserve(12); // exhaust the generators

        assert_eq!(index.by_kind(ResourceKind::Food).len(), 1);
        assert_eq!(index.by_location("Z1").len(), 2);
        assert_eq!(index.available().len(), 2);
    }

    #[test]
    fn totals_sum_available_stock_per_kind() {
        let mut index = index();
        index.get_mut("R1").unwrap().reserve(400);

        let totals = index.totals_by_kind();
        assert_eq!(totals[&ResourceKind::Food], 600);
        assert_eq!(totals[&ResourceKind::Medicine], 300);
        assert_eq!(totals[&ResourceKind::Equipment], 12);
    }

    #[test]
    fn critical_resources_sort_most_urgent_first() {
        let mut index = index();
        let today = day(2024, 6, 1);

        // Equipment starts at 5 + 5 = 10; drain the medicine below 20% for
        // 4 + 4 + 3 = 11.
        index.get_mut("R2").unwrap().reserve(290);

        let critical: Vec<&str> = index
            .critical_resources(today)
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(critical, ["R2", "R3"]);
    }

    #[test]
    fn update_quantity_moves_stock_both_ways() {
        let mut index = index();
        assert!(index.update_quantity("R1", 100));
        assert_eq!(index.get("R1").unwrap().available(), 100);

        assert!(index.update_quantity("R1", 5_000)); // capped at the total
        assert_eq!(index.get("R1").unwrap().available(), 1_000);

        assert!(!index.update_quantity("NOPE", 10));
    }

    #[test]
    fn sufficiency_sums_assigned_available_stock() {
        let mut index = index();
        index.associate("R1", "ROUTE-A");
        index.associate("R2", "ROUTE-A");

        assert!(index.sufficient_for("ROUTE-A", 1300));
        assert!(!index.sufficient_for("ROUTE-A", 1301));
        assert!(!index.sufficient_for("ROUTE-EMPTY", 1));
        assert!(index.sufficient_for("ROUTE-EMPTY", 0));
    }
}
