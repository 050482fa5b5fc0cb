//! Flat JSON snapshot of a whole scenario.
//!
//! A [`Scenario`] is the serialized form of a [`Coordinator`]: plain lists
//! of entities plus the resource-route association pairs and the
//! distribution trees. [`Scenario::capture`] flattens a live coordinator and
//! [`Scenario::build`] replays the snapshot through the coordinator's own
//! registration commands, so a loaded file passes the same referential
//! checks as interactive input.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    coordinator::{self, Coordinator},
    distribution::DistributionTree,
    domain::{Evacuation, RescueTeam, Resource, Route, User, Zone},
};

/// Failure to read a scenario file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid scenario JSON.
    #[error("failed to parse scenario file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to write a scenario file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The file could not be written.
    #[error("failed to write scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario could not be serialized.
    #[error("failed to serialize scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of a coordinator.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// All zones.
    #[serde(default)]
    pub zones: Vec<Zone>,

    /// All routes.
    #[serde(default)]
    pub routes: Vec<Route>,

    /// All resources, placed stock included.
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// All rescue teams.
    #[serde(default)]
    pub teams: Vec<RescueTeam>,

    /// All users.
    #[serde(default)]
    pub users: Vec<User>,

    /// Evacuations still waiting in the queue.
    #[serde(default)]
    pub pending: Vec<Evacuation>,

    /// Evacuations already taken off the queue, in processing order.
    #[serde(default)]
    pub processed: Vec<Evacuation>,

    /// Resource-route association pairs, `(resource id, route id)`.
    #[serde(default)]
    pub associations: Vec<(String, String)>,

    /// Distribution trees, keyed by id.
    #[serde(default)]
    pub trees: BTreeMap<String, DistributionTree>,
}

impl Scenario {
    /// Reads a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let scenario: Self = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            zones = scenario.zones.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Writes the scenario to a JSON file, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Flattens a live coordinator into a scenario snapshot.
    #[must_use]
    pub fn capture(coordinator: &Coordinator) -> Self {
        Self {
            zones: coordinator.zones().cloned().collect(),
            routes: coordinator.graph().routes().cloned().collect(),
            resources: coordinator.resources().iter().cloned().collect(),
            teams: coordinator.teams().cloned().collect(),
            users: coordinator.users().cloned().collect(),
            pending: coordinator.pending_evacuations(),
            processed: coordinator.processed_evacuations().to_vec(),
            associations: coordinator.resources().associations(),
            trees: coordinator
                .trees()
                .iter()
                .map(|(id, tree)| (id.clone(), tree.clone()))
                .collect(),
        }
    }

    /// Replays the snapshot into a fresh coordinator.
    ///
    /// # Errors
    ///
    /// Returns the first [`coordinator::Error`] hit while re-registering the
    /// entities, e.g. a route referencing a zone missing from the file.
    pub fn build(self) -> Result<Coordinator, coordinator::Error> {
        let mut coordinator = Coordinator::new();

        for zone in self.zones {
            coordinator.add_zone(zone)?;
        }
        for route in self.routes {
            coordinator.add_route(route)?;
        }
        for resource in self.resources {
            coordinator.add_resource(resource)?;
        }
        for team in self.teams {
            coordinator.add_team(team)?;
        }
        for user in self.users {
            coordinator.add_user(user)?;
        }
        for (resource, route) in self.associations {
            coordinator.associate_resource_with_route(&resource, &route)?;
        }
        for evacuation in self.pending {
            coordinator.restore_pending(evacuation);
        }
        for evacuation in self.processed {
            coordinator.restore_processed(evacuation);
        }
        for (id, tree) in self.trees {
            coordinator.restore_tree(id, tree);
        }

        Ok(coordinator)
    }
}

#[cfg(test)]
mod tests {
    use super::Scenario;
    use crate::{
        coordinator::Coordinator,
        domain::{Resource, ResourceKind, Role, TransportMode, User, Zone},
    };

    fn scenario() -> Coordinator {
        let mut c = Coordinator::new();
        c.add_zone(Zone::new("Z1", "North", 0.0, 0.0, 8_000)).unwrap();
        c.add_zone(Zone::new("Z2", "South", 3.0, 4.0, 200)).unwrap();
        c.connect_zones("R1", "Z1", "Z2", 40.0, 1.0, TransportMode::Land)
            .unwrap();
        c.add_resource(Resource::new(
            "WATER",
            "Bottled water",
            ResourceKind::Food,
            1_000,
            "litres",
            "Z2",
        ))
        .unwrap();
        c.add_user(User::new("U1", "Ana", "ana", Role::Admin)).unwrap();
        c.associate_resource_with_route("WATER", "R1").unwrap();
        c.plan_evacuation("EV1", "Z1", "Z2", 2_000, None, "ops")
            .unwrap();
        c.create_distribution_tree("D1", "WATER", 100).unwrap();
        c
    }

    #[test]
    fn capture_and_build_preserve_the_scenario() {
        let original = scenario();
        let rebuilt = Scenario::capture(&original).build().unwrap();

        assert_eq!(rebuilt.zone("Z1"), original.zone("Z1"));
        assert_eq!(rebuilt.graph().route_count(), 1);
        assert_eq!(rebuilt.resources().get("WATER"), original.resources().get("WATER"));
        assert_eq!(
            rebuilt.resources().routes_of("WATER"),
            original.resources().routes_of("WATER")
        );
        assert_eq!(rebuilt.peek_next().unwrap().id(), "EV1");
        assert_eq!(rebuilt.distribution_total("D1").unwrap(), 100);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scenario.json");

        Scenario::capture(&scenario()).save(&path).unwrap();
        let loaded = Scenario::load(&path).unwrap();

        assert_eq!(loaded.zones.len(), 2);
        assert_eq!(loaded.routes.len(), 1);
        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.associations, vec![("WATER".into(), "R1".into())]);

        let coordinator = loaded.build().unwrap();
        assert_eq!(coordinator.statistics().zones, 2);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let scenario: Scenario = serde_json::from_str("{}").unwrap();
        assert!(scenario.zones.is_empty());
        let coordinator = scenario.build().unwrap();
        assert_eq!(coordinator.statistics().zones, 0);
    }

    #[test]
    fn dangling_references_fail_the_build() {
        let mut snapshot = Scenario::capture(&scenario());
        snapshot.zones.clear();
        assert!(snapshot.build().is_err());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Scenario::load(&path).is_err());
    }
}
